//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, limits, timeouts)
//! - HTTP header allow-lists and the security header table
//! - The allowed image media-type set
//! - Configuration types (library-only, no CLI dependencies)

mod constants;
mod headers;
mod mime;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::{PROXY_REQUEST_HEADERS, PROXY_RESPONSE_HEADERS, SECURITY_HEADERS};
pub use mime::{is_allowed_image_type, ALLOWED_IMAGE_TYPES};
pub use types::{LogFormat, LogLevel, ProxySettings};
