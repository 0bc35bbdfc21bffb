//! Response construction.
//!
//! # Responsibilities
//! - Relay the upstream response (status, allow-listed headers, body stream)
//! - Synthesize the preflight, not-found and proxy-error responses
//! - Stamp the fixed CORS and additional headers on every response
//!
//! # Design Decisions
//! - Upstream bodies are streamed, never buffered
//! - Error bodies go through one serde struct with a fixed schema
//! - Timestamps are UTC ISO-8601 with millisecond precision

use axum::body::Body;
use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::ProxySettings;
use crate::http::headers::{
    HeaderPipeline, RELAYED_RESPONSE_HEADERS, X_ORIGINAL_STATUS, X_TARGET_URL,
};

/// JSON body of every response produced by the proxy itself.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
    pub timestamp: String,
}

/// Current UTC time as `2026-10-14T12:00:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn fixed_pipeline(settings: &ProxySettings, pipeline: HeaderPipeline) -> HeaderPipeline {
    pipeline
        .overlay(&settings.cors_headers)
        .overlay(&settings.additional_headers)
}

fn with_headers(status: StatusCode, headers: axum::http::HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn json_response(settings: &ProxySettings, status: StatusCode, body: &ErrorBody<'_>) -> Response {
    // Serializing a struct of strings cannot fail.
    let payload = serde_json::to_vec(body).unwrap_or_default();
    let pipeline = HeaderPipeline::new()
        .set(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let headers = fixed_pipeline(settings, pipeline).finish();
    with_headers(status, headers, Body::from(payload))
}

/// `204 No Content` answer to a CORS preflight.
pub fn preflight(settings: &ProxySettings) -> Response {
    let headers = fixed_pipeline(settings, HeaderPipeline::new()).finish();
    with_headers(StatusCode::NO_CONTENT, headers, Body::empty())
}

/// `404` for a path outside the proxied prefix.
pub fn not_found(settings: &ProxySettings, path: &str) -> Response {
    let body = ErrorBody {
        error: "Not Found",
        message: format!(
            "This proxy only handles requests whose path starts with {}",
            settings.api_prefix
        ),
        path: Some(path),
        timestamp: timestamp(),
    };
    json_response(settings, StatusCode::NOT_FOUND, &body)
}

/// `500` for any failure of the upstream exchange.
pub fn proxy_error(settings: &ProxySettings, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: "Proxy Error",
        message: message.into(),
        path: None,
        timestamp: timestamp(),
    };
    json_response(settings, StatusCode::INTERNAL_SERVER_ERROR, &body)
}

/// Relay an upstream response to the caller.
pub fn relay(settings: &ProxySettings, upstream: reqwest::Response, target: &str) -> Response {
    let status = upstream.status();

    let mut pipeline = HeaderPipeline::new().copy_from(upstream.headers(), &RELAYED_RESPONSE_HEADERS);
    pipeline = fixed_pipeline(settings, pipeline);
    match HeaderValue::from_str(target) {
        Ok(value) => pipeline = pipeline.set(X_TARGET_URL, value),
        Err(_) => tracing::warn!(target_url = %target, "Target URL is not a valid header value"),
    }
    let headers = pipeline
        .set(X_ORIGINAL_STATUS, HeaderValue::from(status.as_u16()))
        .finish();

    with_headers(status, headers, Body::from_stream(upstream.bytes_stream()))
}
