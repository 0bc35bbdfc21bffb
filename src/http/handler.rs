//! The proxy request handler.
//!
//! Decision order, first match wins:
//! 1. `OPTIONS` → preflight `204`
//! 2. path outside `api_prefix` → `404` JSON
//! 3. forward to the upstream, relay its response
//! 4. any failure in step 3 → `500` JSON

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::config::ProxySettings;
use crate::error::ProxyError;
use crate::http::request::{build_upstream_request, resolve_target};
use crate::http::response::{not_found, preflight, proxy_error, relay};
use crate::http::server::AppState;

/// Axum entry point.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    handle(request, &state.settings, &state.client).await
}

/// Produce exactly one response for `request`.
pub async fn handle(
    request: Request<Body>,
    settings: &ProxySettings,
    client: &reqwest::Client,
) -> Response {
    tracing::debug!(method = %request.method(), path = %request.uri().path(), "Incoming request");

    if request.method() == Method::OPTIONS {
        return preflight(settings);
    }

    let path = request.uri().path().to_string();
    let target = match resolve_target(settings, request.uri()) {
        Some(target) => target,
        None => {
            tracing::debug!(path = %path, "Path outside API prefix");
            return not_found(settings, &path);
        }
    };

    match forward(request, settings, client, &target).await {
        Ok(upstream) => {
            tracing::debug!(
                target_url = %target,
                status = upstream.status().as_u16(),
                "Upstream responded"
            );
            relay(settings, upstream, &target)
        }
        Err(e) => {
            tracing::warn!(target_url = %target, error = %e, "Proxy error");
            proxy_error(settings, e.to_string())
        }
    }
}

async fn forward(
    request: Request<Body>,
    settings: &ProxySettings,
    client: &reqwest::Client,
    target: &str,
) -> Result<reqwest::Response, ProxyError> {
    let upstream_request = build_upstream_request(client, settings, request, target).await?;
    Ok(client.execute(upstream_request).await?)
}
