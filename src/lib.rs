//! camomile: an SSRF-safe HTTP image proxy.
//!
//! camomile streams third-party, possibly insecure, image resources to end
//! users on behalf of a content host. Each inbound request carries an
//! HMAC-signed URL; the proxy verifies the signature, validates the target
//! against an IP-range taxonomy (blocking private, loopback, link-local,
//! multicast, and reserved space), fetches the resource with manual redirect
//! following that re-validates every hop, enforces size and content-type
//! limits, and streams the bytes back behind hardened response headers.
//!
//! # Example
//!
//! ```no_run
//! use camomile::{CamoServer, ProxySettings};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let server = CamoServer::new(ProxySettings {
//!     secret: "myVerySecretSecret".into(),
//!     ..Default::default()
//! })?;
//! server.listen("127.0.0.1:1080".parse()?).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Signed paths have the shape `/<digest>/<hex>` where `digest` is the
//! lowercase hex HMAC-SHA-1 of the target URL under the shared secret and
//! `hex` is the lowercase hex encoding of the URL bytes; see
//! [`signature::sign_url`].

#![warn(missing_docs)]

pub mod config;
mod error;
mod fetch;
mod handler;
mod headers;
pub mod initialization;
mod security;
mod server;
pub mod signature;

// Re-export public API
pub use config::{LogFormat, LogLevel, ProxySettings};
pub use error::ProxyError;
pub use fetch::{safe_fetch, FetchRequest, FetchResult};
pub use headers::{filter_headers, security_headers};
pub use security::{classify, is_public_unicast, IpRange, SsrfPolicy, TargetPolicy};
pub use server::CamoServer;
