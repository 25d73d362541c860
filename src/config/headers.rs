//! HTTP header allow-lists and the security header table.
//!
//! The proxy never forwards a header that is not named here. Inbound request
//! headers outside [`PROXY_REQUEST_HEADERS`] are dropped before the upstream
//! request is built; upstream response headers outside
//! [`PROXY_RESPONSE_HEADERS`] are dropped before the client response is
//! written. [`SECURITY_HEADERS`] is stamped on every response the proxy
//! originates, success or error.

use http::header::{
    HeaderName, ACCEPT, ACCEPT_CHARSET, ACCEPT_LANGUAGE, ACCEPT_RANGES, CACHE_CONTROL,
    CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_SECURITY_POLICY, CONTENT_TYPE, ETAG,
    EXPIRES, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, RANGE, STRICT_TRANSPORT_SECURITY,
    TRANSFER_ENCODING, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};

/// Inbound request headers forwarded to the upstream server.
///
/// `Accept-Encoding` is intentionally absent: the fetcher counts body bytes
/// post-decompression, so the wire encoding is left to the client library.
/// `X-Forwarded-For` is intentionally absent: the proxy must not leak the
/// end user's address to arbitrary origins.
pub const PROXY_REQUEST_HEADERS: &[HeaderName] = &[
    ACCEPT,
    ACCEPT_CHARSET,
    ACCEPT_LANGUAGE,
    CACHE_CONTROL,
    IF_NONE_MATCH,
    IF_MODIFIED_SINCE,
    RANGE,
];

/// Upstream response headers forwarded to the client.
///
/// `Server` is intentionally absent so origins cannot inject their own
/// server identification through the proxy.
pub const PROXY_RESPONSE_HEADERS: &[HeaderName] = &[
    ACCEPT_RANGES,
    CACHE_CONTROL,
    CONTENT_LENGTH,
    CONTENT_ENCODING,
    CONTENT_RANGE,
    CONTENT_TYPE,
    ETAG,
    EXPIRES,
    LAST_MODIFIED,
    TRANSFER_ENCODING,
];

/// Hardening headers emitted on every response the proxy originates.
pub const SECURITY_HEADERS: &[(HeaderName, &str)] = &[
    (X_FRAME_OPTIONS, "deny"),
    (X_XSS_PROTECTION, "1; mode=block"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (
        CONTENT_SECURITY_POLICY,
        "default-src 'none'; img-src data:; style-src 'unsafe-inline'",
    ),
    (
        STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains",
    ),
];
