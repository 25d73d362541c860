//! The safe fetcher: upstream HTTP exchange with per-hop validation.
//!
//! Redirects are followed manually so every `Location` is validated before
//! it is requested; a client that follows redirects transparently would skip
//! the SSRF check on intermediate hops. The body is read in chunks against a
//! byte budget, and every suspension point also watches the request's
//! cancellation token so a departed client aborts upstream I/O within one
//! chunk.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, Method, StatusCode};
use log::debug;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{is_allowed_image_type, MAX_REDIRECT_HOPS};
use crate::error::ProxyError;
use crate::security::TargetPolicy;

/// An upstream request the fetcher should perform.
///
/// The URL must already have passed the target policy; the headers must
/// already be filtered to the request allow-list.
#[derive(Debug)]
pub struct FetchRequest {
    /// Validated target URL.
    pub url: Url,
    /// `GET` or `HEAD`.
    pub method: Method,
    /// Allow-listed request headers to forward.
    pub headers: HeaderMap,
}

/// The outcome of a successful fetch.
#[derive(Debug)]
pub struct FetchResult {
    /// The upstream body; absent for HEAD requests.
    pub body: Option<Bytes>,
    /// The upstream response headers, unfiltered.
    pub headers: HeaderMap,
}

/// Checks if an HTTP status code indicates a redirect the fetcher follows.
fn is_redirect_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Maps an outbound transport failure onto the pipeline error model.
///
/// Failures caused by the remote server are client-visible 400s; a request
/// that could not even be built is an internal fault.
fn map_transport_error(err: reqwest::Error) -> ProxyError {
    if err.is_builder() {
        ProxyError::Internal(err.into())
    } else {
        ProxyError::bad_request(err.to_string())
    }
}

/// Fetches a validated URL, following up to [`MAX_REDIRECT_HOPS`] redirects
/// with per-hop re-validation, and returns the body and headers of the
/// terminal response.
///
/// # Arguments
///
/// * `client` - HTTP client with redirects disabled (manual following is
///   load-bearing here)
/// * `policy` - Target policy re-run on every redirect hop
/// * `request` - The validated URL, method, and filtered headers
/// * `max_size` - Byte budget for the body; exceeding it aborts with 413
/// * `cancel` - Cancellation tied to the inbound client connection
///
/// # Errors
///
/// Client-visible errors for redirect, content-type, and size violations;
/// [`ProxyError::Canceled`] when the token fires mid-flight.
pub async fn safe_fetch(
    client: reqwest::Client,
    policy: Arc<dyn TargetPolicy>,
    request: FetchRequest,
    max_size: Option<u64>,
    cancel: CancellationToken,
) -> Result<FetchResult, ProxyError> {
    let FetchRequest {
        mut url,
        method,
        headers,
    } = request;

    let mut redirects = 0;
    let mut response = loop {
        let send = client
            .request(method.clone(), url.clone())
            .headers(headers.clone())
            .send();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ProxyError::Canceled),
            result = send => result.map_err(map_transport_error)?,
        };

        if is_redirect_status(response.status()) && redirects < MAX_REDIRECT_HOPS {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    ProxyError::bad_request(
                        "Unexpected missing `Location` header in redirect response by remote server",
                    )
                })?;
            // Absolute Location values stand alone; relative ones resolve
            // against the URL that produced them.
            let next = Url::parse(location)
                .or_else(|_| url.join(location))
                .map_err(|e| ProxyError::bad_request(e.to_string()))?;
            debug!("following redirect {} -> {}", url, next);
            url = policy.validate(next.as_str()).await?;
            redirects += 1;
            continue;
        }

        // A redirect status that survives the hop budget falls through as
        // the terminal response and faces the same checks as any other.
        break response;
    };

    let response_headers = response.headers().clone();

    let content_type = response_headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if content_type.is_empty() {
        return Err(ProxyError::bad_request(
            "Unexpected missing `Content-type` header in remote server response",
        ));
    }
    if !is_allowed_image_type(&content_type.to_ascii_lowercase()) {
        return Err(ProxyError::bad_request(
            "Unexpected non-image `Content-type` in remote server response, \
             this might not be an image or it might not be supported by camomile",
        ));
    }

    if method == Method::HEAD {
        return Ok(FetchResult {
            body: None,
            headers: response_headers,
        });
    }

    let mut body = BytesMut::new();
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => return Err(ProxyError::Canceled),
            chunk = response.chunk() => chunk.map_err(map_transport_error)?,
        };
        let Some(chunk) = chunk else { break };
        if let Some(limit) = max_size {
            if body.len() as u64 + chunk.len() as u64 > limit {
                // Dropping the response tears down the upstream connection;
                // nothing further is read.
                return Err(ProxyError::client(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Unexpected too large `Content-Length`",
                ));
            }
        }
        body.extend_from_slice(&chunk);
    }

    Ok(FetchResult {
        body: Some(body.freeze()),
        headers: response_headers,
    })
}
