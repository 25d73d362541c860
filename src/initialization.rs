//! Process-wide resource construction: logger, HTTP client, DNS resolver.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use hickory_resolver::TokioAsyncResolver;
use log::LevelFilter;
use reqwest::ClientBuilder;

use crate::config::{LogFormat, CONNECT_TIMEOUT_SECS, DNS_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Failure to set up process-wide facilities.
#[derive(Debug)]
pub enum InitializationError {
    /// The global logger was already installed.
    LoggerError(log::SetLoggerError),
}

impl From<log::SetLoggerError> for InitializationError {
    fn from(err: log::SetLoggerError) -> InitializationError {
        InitializationError::LoggerError(err)
    }
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InitializationError::LoggerError(e) => write!(f, "Logger initialization error: {}", e),
        }
    }
}

impl std::error::Error for InitializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitializationError::LoggerError(e) => Some(e),
        }
    }
}

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors) and JSON formats for structured logging. Chatty transport
/// internals are pinned to warning level.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Warn);
    builder.filter_module("hyper", LevelFilter::Warn);
    // Suppress hickory warnings about malformed DNS messages; they are
    // expected with truncated responses and handled gracefully upstream.
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("camomile", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    builder.try_init()?;

    Ok(())
}

/// Initializes the outbound HTTP client.
///
/// Redirects are disabled: the fetcher follows them manually so every hop
/// can be validated before it is requested. Connect and read timeouts bound
/// how long an unresponsive origin can hold a request.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .build()
}

/// Initializes the DNS resolver for hostname lookups.
///
/// Uses the default resolver configuration with tightened timeouts so slow
/// or unresponsive DNS servers fail fast instead of stalling requests.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    // ndots = 0 prevents search-domain appending on bare hostnames.
    opts.ndots = 0;

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(init_client().is_ok());
    }

    #[tokio::test]
    async fn test_resolver_builds() {
        // Construction never touches the network.
        let _resolver = init_resolver();
    }
}
