// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `GEO_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "GEO";

impl Config {
    /// Load configuration using the path given as first CLI argument,
    /// falling back to `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional).
    ///
    /// Layers, lowest priority first: built-in defaults, the file (if
    /// present), then `GEO_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
