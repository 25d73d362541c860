//! Per-request state machine.
//!
//! Each inbound request runs the same strictly sequential pipeline:
//! method gate, path split, signature verification, SSRF validation, fetch,
//! emit. Failures short-circuit to a client-visible status with a stable
//! message; anything unrecognized becomes a 500 with the cause logged.
//! Every response the proxy originates carries the security header set.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::response::Response;
use http::header::{HeaderValue, VIA};
use http::{Method, Request, StatusCode};
use log::{debug, error};
use tokio_util::sync::CancellationToken;

use crate::config::{ProxySettings, PROXY_REQUEST_HEADERS, PROXY_RESPONSE_HEADERS};
use crate::error::ProxyError;
use crate::fetch::{safe_fetch, FetchRequest, FetchResult};
use crate::headers::{filter_headers, security_headers};
use crate::security::TargetPolicy;
use crate::signature;

/// Shared, read-only resources for request handling.
pub(crate) struct ProxyState {
    pub settings: ProxySettings,
    pub client: reqwest::Client,
    pub policy: Arc<dyn TargetPolicy>,
    /// Pre-validated `Via` value for the configured server name.
    pub via: HeaderValue,
}

/// Entry point for every request the router receives.
pub(crate) async fn proxy_request(
    State(state): State<Arc<ProxyState>>,
    req: Request<Body>,
) -> Response {
    match run(state, req).await {
        Ok(response) => response,
        Err(err) => error_response(err),
    }
}

async fn run(state: Arc<ProxyState>, req: Request<Body>) -> Result<Response, ProxyError> {
    let method = req.method().clone();
    if method != Method::GET && method != Method::HEAD {
        return Err(ProxyError::client(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
        ));
    }

    // "/<digest>/<hex>": the leading slash yields an empty first segment.
    // Trailing segments are tolerated and ignored.
    let segments: Vec<&str> = req.uri().path().split('/').collect();
    if segments.len() < 3 {
        return Err(ProxyError::client(StatusCode::NOT_FOUND, "Malformed request"));
    }

    let url =
        signature::decode_signed_url(state.settings.secret.as_bytes(), segments[1], segments[2])
            .map_err(|err| {
                debug!("rejected signed path: {err}");
                ProxyError::client(StatusCode::FORBIDDEN, "Bad signature")
            })?;

    let url = state.policy.validate(&url).await?;
    debug!("fetching {url} for {method} {}", req.uri().path());

    let upstream_headers = filter_headers(req.headers(), PROXY_REQUEST_HEADERS);

    // The guard cancels the token when this handler is dropped, which is how
    // hyper surfaces a client disconnect; the spawned fetch then aborts its
    // upstream I/O within one chunk. A canceled fetch is terminal and silent.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let fetch = tokio::spawn(safe_fetch(
        state.client.clone(),
        state.policy.clone(),
        FetchRequest {
            url,
            method: method.clone(),
            headers: upstream_headers,
        },
        Some(state.settings.max_size),
        cancel,
    ));
    let result = fetch
        .await
        .map_err(|err| ProxyError::Internal(anyhow::anyhow!(err)))??;

    Ok(success_response(result, &method, &state.via))
}

/// Builds the 2xx response: security headers, then the filtered upstream
/// headers, then `Via`. HEAD succeeds as 204 with the headers preserved.
fn success_response(result: FetchResult, method: &Method, via: &HeaderValue) -> Response {
    let mut headers = security_headers();
    let filtered = filter_headers(&result.headers, PROXY_RESPONSE_HEADERS);
    for (name, value) in filtered.iter() {
        headers.insert(name.clone(), value.clone());
    }
    headers.insert(VIA, via.clone());

    let (status, body) = if *method == Method::HEAD {
        (StatusCode::NO_CONTENT, Body::empty())
    } else {
        match result.body {
            Some(bytes) => (StatusCode::OK, Body::from(bytes)),
            None => (StatusCode::OK, Body::empty()),
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn error_response(err: ProxyError) -> Response {
    let (status, message) = match err {
        ProxyError::Client { status, message } => (status, message),
        ProxyError::Canceled => {
            // The socket is gone; this response is never written.
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return response;
        }
        ProxyError::Internal(cause) => {
            error!("internal proxy error: {cause:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    *response.headers_mut() = security_headers();
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_client;
    use async_trait::async_trait;
    use url::Url;

    struct AllowAll;

    #[async_trait]
    impl TargetPolicy for AllowAll {
        async fn validate(&self, url: &str) -> Result<Url, ProxyError> {
            Url::parse(url).map_err(|e| ProxyError::bad_request(e.to_string()))
        }
    }

    fn state() -> Arc<ProxyState> {
        Arc::new(ProxyState {
            settings: ProxySettings {
                secret: "myVerySecretSecret".into(),
                ..Default::default()
            },
            client: init_client().unwrap(),
            policy: Arc::new(AllowAll),
            via: HeaderValue::from_static("camomile"),
        })
    }

    fn request(method: &str, path: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_security_headers(response: &Response) {
        for (name, value) in crate::config::SECURITY_HEADERS {
            assert_eq!(response.headers().get(name).unwrap(), value);
        }
    }

    #[tokio::test]
    async fn test_disallowed_method_rejected() {
        let response = proxy_request(State(state()), request("DELETE", "/a/b")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_security_headers(&response);
        assert_eq!(body_string(response).await, "Method not allowed");
    }

    #[tokio::test]
    async fn test_short_path_rejected() {
        for path in ["/", "/onlydigest"] {
            let response = proxy_request(State(state()), request("GET", path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_security_headers(&response);
            assert_eq!(body_string(response).await, "Malformed request");
        }
    }

    #[tokio::test]
    async fn test_bad_signature_rejected() {
        let path = signature::sign_url(b"invalid", "http://example.com/index.png");
        let response = proxy_request(State(state()), request("GET", &path)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_security_headers(&response);
        assert_eq!(body_string(response).await, "Bad signature");
    }

    #[tokio::test]
    async fn test_method_gate_runs_before_signature() {
        // A validly signed path still cannot be POSTed.
        let path = signature::sign_url(b"myVerySecretSecret", "http://example.com/index.png");
        let response = proxy_request(State(state()), request("POST", &path)).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
