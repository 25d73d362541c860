//! Configuration constants.
//!
//! Defaults and operational limits used throughout the proxy. Values that a
//! deployment commonly tunes (max size, server name) are surfaced through
//! `ProxySettings`; the rest are fixed here.

/// Default maximum upstream body size in bytes (100 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 104_857_600;

/// Default server name, emitted in the `Via` header on successful responses.
pub const DEFAULT_SERVER_NAME: &str = "camomile";

/// Default bind address for the built-in listener.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:1080";

/// Maximum number of redirect hops the fetcher will follow.
///
/// Every hop is re-validated before it is requested. A redirect status that
/// survives the cap is treated as the terminal upstream response.
pub const MAX_REDIRECT_HOPS: usize = 3;

// Network operation timeouts
/// DNS query timeout in seconds.
/// Most queries complete in well under a second; failing fast keeps a slow
/// resolver from stalling the whole request.
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// TCP connect timeout for upstream requests, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Read timeout for upstream requests, in seconds. Applies between reads,
/// not to the transfer as a whole, so large images stream without tripping it.
pub const READ_TIMEOUT_SECS: u64 = 30;
