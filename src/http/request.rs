//! Outbound request construction.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the upstream origin
//! - Filter inbound headers through the forward allow-list
//! - Inject the configured bearer credential
//! - Decide whether the inbound body travels upstream
//!
//! # Design Decisions
//! - The path and query are concatenated verbatim (no re-encoding)
//! - Cookies, Host, Origin and any other header not listed are never forwarded
//! - The inbound body is buffered (bounded) before forwarding

use axum::body::{self, Body};
use axum::http::header::{HeaderMap, AUTHORIZATION};
use axum::http::{Method, Request, Uri};

use crate::config::ProxySettings;
use crate::error::Result;
use crate::http::headers::{copy_allowed, FORWARDED_REQUEST_HEADERS};

/// Strip the configured prefix from `path`, or `None` if it is not proxied.
///
/// The prefix must end at a segment boundary: the remainder is empty or starts
/// with `/`. Anything else (`/api.evil.com`, `/api@host`, `/api:8443`) would
/// rewrite the authority of the target URL.
pub fn strip_api_prefix<'a>(settings: &ProxySettings, path: &'a str) -> Option<&'a str> {
    path.strip_prefix(settings.api_prefix.as_str())
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// `upstream_base_url + rest + ?query`.
pub fn target_url(settings: &ProxySettings, rest: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}{}?{}", settings.upstream_base_url, rest, q),
        _ => format!("{}{}", settings.upstream_base_url, rest),
    }
}

/// Resolve the upstream URL for `uri`, or `None` if the path is not proxied.
pub fn resolve_target(settings: &ProxySettings, uri: &Uri) -> Option<String> {
    strip_api_prefix(settings, uri.path()).map(|rest| target_url(settings, rest, uri.query()))
}

/// Headers sent upstream: the allow-listed inbound ones, then the configured token.
pub fn outbound_headers(settings: &ProxySettings, inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    copy_allowed(inbound, &FORWARDED_REQUEST_HEADERS, &mut headers);

    if let Some(authorization) = &settings.authorization {
        headers.insert(AUTHORIZATION, authorization.clone());
    }

    headers
}

/// `GET` and `HEAD` never carry a body upstream.
pub fn forwards_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Build the upstream request for an inbound request already known to be proxied.
pub async fn build_upstream_request(
    client: &reqwest::Client,
    settings: &ProxySettings,
    request: Request<Body>,
    target: &str,
) -> Result<reqwest::Request> {
    let (parts, inbound_body) = request.into_parts();

    let mut builder = client
        .request(parts.method.clone(), target)
        .headers(outbound_headers(settings, &parts.headers));

    if forwards_body(&parts.method) {
        let bytes = body::to_bytes(inbound_body, settings.max_request_body_bytes).await?;
        builder = builder.body(bytes);
    }

    Ok(builder.build()?)
}
