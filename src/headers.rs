//! Allow-list header filtering.

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::SECURITY_HEADERS;

/// Copies the allow-listed headers present in `source` into a new map.
///
/// Lookup is case-insensitive; the output carries exactly the allow-listed
/// names, so nothing outside the list can pass through regardless of how the
/// source spelled it. Values are copied verbatim.
pub fn filter_headers(source: &HeaderMap, allowed: &[HeaderName]) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for name in allowed {
        if let Some(value) = source.get(name) {
            filtered.insert(name.clone(), value.clone());
        }
    }
    filtered
}

/// The hardening headers stamped on every response the proxy originates.
pub fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name.clone(), HeaderValue::from_static(value));
    }
    headers
}
