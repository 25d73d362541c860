//! URL validation and SSRF protection.
//!
//! Every URL the fetcher visits (the signed target and every redirect hop)
//! passes through a [`TargetPolicy`] first. The production policy parses the
//! URL, rejects non-http(s) schemes, resolves the host, and rejects any
//! address that is not publicly routable unicast. This blocks access to:
//! - Private/internal addresses (RFC 1918, RFC 4193, etc.)
//! - Loopback and link-local addresses
//! - Multicast, carrier-grade NAT, and reserved ranges
//! - Non-HTTP/HTTPS schemes (file://, ftp://, etc.)

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use log::debug;
use url::{Host, Url};

use crate::error::ProxyError;
use crate::security::ip_range;

/// Decides whether a URL may be fetched.
///
/// The seam exists so embedders can substitute their own policy (and so the
/// test suite can exercise the fetcher against local mock origins); the
/// proxy default is [`SsrfPolicy`].
#[async_trait]
pub trait TargetPolicy: Send + Sync {
    /// Validates a URL string, returning the parsed URL when it is safe to
    /// fetch.
    ///
    /// # Errors
    ///
    /// Returns a client-visible 400 describing why the target was rejected.
    async fn validate(&self, url: &str) -> Result<Url, ProxyError>;
}

/// The production policy: scheme gate, DNS resolution, IP-range check.
pub struct SsrfPolicy {
    resolver: Arc<TokioAsyncResolver>,
}

impl SsrfPolicy {
    /// Creates a policy that resolves hostnames with the given resolver.
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl TargetPolicy for SsrfPolicy {
    async fn validate(&self, url_str: &str) -> Result<Url, ProxyError> {
        let url = Url::parse(url_str).map_err(|e| ProxyError::bad_request(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ProxyError::bad_request(format!(
                    "Unexpected non-http protocol `{scheme}:`, expected `http:` or `https:`"
                )));
            }
        }

        let ip: IpAddr = match url.host() {
            Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
            Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
            Some(Host::Domain(domain)) => {
                let lookup = self.resolver.lookup_ip(domain).await.map_err(|e| {
                    debug!("lookup for {domain} failed: {e}");
                    ProxyError::bad_request(format!("Could not look up host `{domain}`"))
                })?;
                lookup.iter().next().ok_or_else(|| {
                    ProxyError::bad_request(format!("Could not look up host `{domain}`"))
                })?
            }
            None => return Err(ProxyError::bad_request("Bad url host")),
        };

        if !ip_range::is_public_unicast(ip) {
            debug!("rejected {url_str}: {:?} address", ip_range::classify(ip));
            return Err(ProxyError::bad_request("Bad url host"));
        }

        Ok(url)
    }
}
