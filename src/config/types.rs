//! Configuration types and CLI enums.

use clap::ValueEnum;

use crate::config::constants::{DEFAULT_MAX_SIZE, DEFAULT_SERVER_NAME};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Proxy configuration (no CLI dependencies).
///
/// Constructed once and immutable for the lifetime of the server. The secret
/// is required; construction of [`crate::CamoServer`] fails when it is empty.
///
/// # Examples
///
/// ```no_run
/// use camomile::ProxySettings;
///
/// let settings = ProxySettings {
///     secret: "myVerySecretSecret".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Shared HMAC secret used to verify signed URLs. Must be non-empty.
    pub secret: String,

    /// Maximum upstream body size in bytes. Responses whose bodies would
    /// exceed this are aborted with 413.
    pub max_size: u64,

    /// Server name emitted in the `Via` header on successful responses.
    pub server_name: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            max_size: DEFAULT_MAX_SIZE,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}
