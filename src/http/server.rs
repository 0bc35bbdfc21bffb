//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing)
//! - Build the upstream HTTP client
//! - Bind server to listener, shut down gracefully

use std::sync::Arc;

use axum::{body::Body, http::Request, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxySettings;
use crate::http::handler::proxy_handler;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProxySettings>,
    pub client: reqwest::Client,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    settings: Arc<ProxySettings>,
}

impl HttpServer {
    /// Create a new HTTP server from compiled settings.
    pub fn new(settings: ProxySettings) -> Result<Self, reqwest::Error> {
        let settings = Arc::new(settings);
        let state = AppState {
            client: build_client(&settings)?,
            settings: settings.clone(),
        };

        Ok(Self {
            router: Self::build_router(state),
            settings,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.settings.upstream_base_url,
            api_prefix = %self.settings.api_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Upstream client. Only the configured timeouts are imposed on top of the transport.
pub fn build_client(settings: &ProxySettings) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
