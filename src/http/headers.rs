//! Header allow-lists and the ordered response header pipeline.
//!
//! Headers are assembled in stages over a [`HeaderMap`]. A stage that sets a
//! name replaces whatever an earlier stage put there:
//!
//! ```text
//! upstream allow-list → CORS headers → additional headers → debug headers
//! ```

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_LENGTH,
    CONTENT_TYPE, ETAG, LAST_MODIFIED, USER_AGENT,
};

pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
pub const X_PROXY_BY: HeaderName = HeaderName::from_static("x-proxy-by");
pub const X_API_BASE: HeaderName = HeaderName::from_static("x-api-base");
pub const X_TARGET_URL: HeaderName = HeaderName::from_static("x-target-url");
pub const X_ORIGINAL_STATUS: HeaderName = HeaderName::from_static("x-original-status");

/// Inbound headers forwarded upstream. Everything else is dropped.
pub const FORWARDED_REQUEST_HEADERS: [HeaderName; 5] =
    [AUTHORIZATION, CONTENT_TYPE, ACCEPT, USER_AGENT, X_REQUESTED_WITH];

/// Upstream headers relayed to the caller. Everything else is dropped.
pub const RELAYED_RESPONSE_HEADERS: [HeaderName; 5] =
    [CONTENT_TYPE, CONTENT_LENGTH, CACHE_CONTROL, ETAG, LAST_MODIFIED];

/// An ordered set of headers stamped onto responses.
#[derive(Debug, Clone, Default)]
pub struct FixedHeaders {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl FixedHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: HeaderName, value: HeaderValue) {
        self.entries.push((name, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry into `headers`, replacing existing values.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.entries {
            headers.insert(name.clone(), value.clone());
        }
    }
}

/// Copy the non-empty values of each allowed header from `source` into `target`.
///
/// Names are matched case-insensitively since `HeaderName` is normalized.
pub fn copy_allowed(source: &HeaderMap, allowed: &[HeaderName], target: &mut HeaderMap) {
    for name in allowed {
        for value in source.get_all(name) {
            if !value.is_empty() {
                target.append(name.clone(), value.clone());
            }
        }
    }
}

/// Builder for an outbound response header set.
#[derive(Debug, Default)]
pub struct HeaderPipeline {
    headers: HeaderMap,
}

impl HeaderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_from(mut self, source: &HeaderMap, allowed: &[HeaderName]) -> Self {
        copy_allowed(source, allowed, &mut self.headers);
        self
    }

    pub fn overlay(mut self, fixed: &FixedHeaders) -> Self {
        fixed.apply(&mut self.headers);
        self
    }

    pub fn set(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn finish(self) -> HeaderMap {
        self.headers
    }
}
