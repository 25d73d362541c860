//! Pipeline error types.
//!
//! Two kinds of failure flow through the request pipeline: errors that are
//! reported to the client with a specific status and a stable message, and
//! everything else, which surfaces as `500 Internal server error` with the
//! cause logged out-of-band. Cancellation is its own terminal, silent case.

use std::fmt;

use http::StatusCode;

/// Error produced by the request pipeline.
#[derive(Debug)]
pub enum ProxyError {
    /// Reported to the client verbatim with the given status.
    Client {
        /// HTTP status written to the client.
        status: StatusCode,
        /// Stable human-readable body.
        message: String,
    },
    /// The inbound client went away; nothing is written and nothing is logged.
    Canceled,
    /// Any other failure; emitted as 500 with the cause logged.
    Internal(anyhow::Error),
}

impl ProxyError {
    /// A client-visible error with an arbitrary status.
    pub fn client(status: StatusCode, message: impl Into<String>) -> Self {
        ProxyError::Client {
            status,
            message: message.into(),
        }
    }

    /// A client-visible `400 Bad Request`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::client(StatusCode::BAD_REQUEST, message)
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProxyError::Client { status, message } => write!(f, "{status}: {message}"),
            ProxyError::Canceled => write!(f, "request canceled by client"),
            ProxyError::Internal(cause) => write!(f, "internal error: {cause}"),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Internal(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ProxyError {
    fn from(err: anyhow::Error) -> ProxyError {
        ProxyError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ProxyError::client(StatusCode::FORBIDDEN, "Bad signature");
        assert_eq!(err.to_string(), "403 Forbidden: Bad signature");
    }

    #[test]
    fn test_internal_error_has_source() {
        use std::error::Error;
        let err = ProxyError::from(anyhow::anyhow!("boom"));
        assert!(err.source().is_some());
        assert!(ProxyError::Canceled.source().is_none());
    }
}
