// Application state module
// Configuration plus the read-only fixture datasets shared by every request

use super::types::Config;
use crate::dataset::{City, Country, Dataset};
use crate::logger::AccessLogFormat;

/// Application state
///
/// Built once at startup and shared behind an `Arc`. Nothing in here is
/// mutated after construction.
pub struct AppState {
    pub config: Config,
    pub access_log_format: AccessLogFormat,
    pub cities: Dataset<City>,
    pub countries: Dataset<Country>,
}

impl AppState {
    /// Create `AppState` with the built-in fixture datasets
    pub fn new(config: &Config) -> Self {
        Self::with_datasets(config, Dataset::fixtures(), Dataset::fixtures())
    }

    /// Create `AppState` around explicit datasets
    pub fn with_datasets(
        config: &Config,
        cities: Dataset<City>,
        countries: Dataset<Country>,
    ) -> Self {
        Self {
            config: config.clone(),
            access_log_format: AccessLogFormat::parse(&config.logging.access_log_format),
            cities,
            countries,
        }
    }
}
