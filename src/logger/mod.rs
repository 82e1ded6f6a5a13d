//! Logger module
//!
//! Provides logging utilities for the service including:
//! - Startup banner and dataset summary
//! - Access logging with multiple formats
//! - Error and warning logging, filtered by `logging.level`
//! - Simulated-write notices for the mock endpoints
//! - Shutdown progress

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;

/// Where a line ends up
#[derive(Clone, Copy)]
enum Channel {
    /// Lifecycle and request notices (access target)
    Info,
    /// One line per request (access target)
    Access,
    /// Warnings and errors (error target)
    Error,
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Until then lines go to
/// stdout/stderr unfiltered.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        LogLevel::parse(&config.logging.level),
    )
}

fn emit(channel: Channel, level: LogLevel, message: &str) {
    let Some(w) = writer::get() else {
        match channel {
            Channel::Error => eprintln!("{message}"),
            Channel::Info | Channel::Access => println!("{message}"),
        }
        return;
    };

    if level > w.level() {
        return;
    }
    match channel {
        Channel::Info => w.write_info(message),
        Channel::Access => w.write_access(message),
        Channel::Error => w.write_error(message),
    }
}

fn info(message: &str) {
    emit(Channel::Info, LogLevel::Info, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let mut lines = vec![
        "======================================".to_string(),
        "Mock geo API started successfully".to_string(),
        format!("Listening on: http://{addr}"),
        format!("Log level: {}", config.logging.level),
    ];
    if let Some(workers) = config.server.workers {
        lines.push(format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        lines.push(format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        lines.push(format!("Error log: {path}"));
    }
    lines.extend([
        format!("  - GET  http://{addr}/api"),
        format!("  - *    http://{addr}/api/cities"),
        format!("  - *    http://{addr}/api/countries"),
        "Writes are simulated and never persisted".to_string(),
        "======================================\n".to_string(),
    ]);
    for line in &lines {
        info(line);
    }
}

pub fn log_dataset_loaded(label: &str, count: usize) {
    info(&format!("[DATA] {label}: {count} fixture records loaded"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    emit(Channel::Error, LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    emit(Channel::Error, LogLevel::Warn, &format!("[WARN] {message}"));
}

/// Log formatted access log entry. Gated by `logging.access_log`, not the level.
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    emit(Channel::Access, LogLevel::Error, &entry.format(format));
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    info(&format!("[API] {method} {path} - {status}"));
}

/// A create/update/delete was computed but not stored
pub fn log_simulated_write(method: &str, label: &str, id: u32) {
    info(&format!("[SIMULATED] {method} {label} id={id} (dataset unchanged)"));
}

pub fn log_signal_received(signal_name: &str) {
    info(&format!(
        "\n[SIGNAL] {signal_name} received, initiating graceful shutdown"
    ));
}

pub fn log_shutdown_started(active: usize) {
    info(&format!(
        "[Shutdown] Stopped accepting connections, {active} still open"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        info("[Shutdown] All connections closed, exiting");
    } else {
        log_warning(&format!(
            "[Shutdown] Timed out with {remaining} connection(s) still open"
        ));
    }
}
