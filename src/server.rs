//! Server façade.
//!
//! Construction validates the settings and builds the shared per-process
//! resources (outbound client, resolver-backed SSRF policy). Hosts that run
//! their own HTTP stack mount [`CamoServer::router`]; `listen` starts the
//! built-in listener.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::Router;
use http::header::HeaderValue;
use log::info;
use tokio::net::TcpListener;

use crate::config::ProxySettings;
use crate::handler::{proxy_request, ProxyState};
use crate::initialization::{init_client, init_resolver};
use crate::security::{SsrfPolicy, TargetPolicy};

/// The image proxy server.
///
/// # Example
///
/// ```no_run
/// use camomile::{CamoServer, ProxySettings};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let server = CamoServer::new(ProxySettings {
///     secret: "myVerySecretSecret".into(),
///     ..Default::default()
/// })?;
/// server.listen("127.0.0.1:1080".parse()?).await?;
/// # Ok(())
/// # }
/// ```
pub struct CamoServer {
    state: Arc<ProxyState>,
}

impl std::fmt::Debug for CamoServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CamoServer").finish()
    }
}

impl CamoServer {
    /// Creates a server with the default SSRF target policy.
    ///
    /// # Errors
    ///
    /// Fails when the secret is missing, the server name is not a valid
    /// header value, or the HTTP client cannot be built.
    pub fn new(settings: ProxySettings) -> Result<Self> {
        let policy = Arc::new(SsrfPolicy::new(init_resolver()));
        Self::with_policy(settings, policy)
    }

    /// Creates a server with a custom target policy.
    ///
    /// Embedders that restrict targets differently (fixed origin lists,
    /// additional ranges) substitute their own [`TargetPolicy`] here.
    pub fn with_policy(settings: ProxySettings, policy: Arc<dyn TargetPolicy>) -> Result<Self> {
        if settings.secret.is_empty() {
            bail!("Expected `secret` in options");
        }
        if settings.server_name.is_empty() {
            bail!("server name must be non-empty");
        }
        let via = HeaderValue::from_str(&settings.server_name)
            .context("server name must be a valid header value")?;
        let client = init_client().context("failed to build HTTP client")?;

        Ok(Self {
            state: Arc::new(ProxyState {
                settings,
                client,
                policy,
                via,
            }),
        })
    }

    /// Returns the request router, for mounting into a host application.
    ///
    /// Every request the router receives goes through the proxy pipeline
    /// regardless of path shape; dispatch happens inside the handler.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(proxy_request)
            .with_state(self.state.clone())
    }

    /// Binds the built-in listener and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails or the server aborts.
    pub async fn listen(&self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(
            "camomile listening on http://{}",
            listener.local_addr().context("listener has no local addr")?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutting down");
            })
            .await
            .context("server error")?;

        Ok(())
    }
}
