//! Compiled, immutable proxy settings.
//!
//! [`ProxySettings`] is the validated form of [`ProxyConfig`]: header values are
//! parsed once at startup so the request path never has to.

use std::time::Duration;

use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};

use crate::config::schema::ProxyConfig;
use crate::config::validation::{check_scalars, header_value, ValidationError};
use crate::http::headers::{FixedHeaders, X_API_BASE, X_PROXY_BY};

#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Origin forwarded requests are sent to, without a trailing slash.
    pub upstream_base_url: String,
    /// Prefix a path must start with to be proxied.
    pub api_prefix: String,
    /// Precomputed `Bearer <token>` credential, marked sensitive.
    pub authorization: Option<HeaderValue>,
    pub cors_headers: FixedHeaders,
    pub additional_headers: FixedHeaders,
    pub max_request_body_bytes: usize,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl ProxySettings {
    /// Validate `config` and compile it, reporting every problem found.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_scalars(config, &mut errors);

        let authorization = match &config.upstream.api_token {
            Some(token) => match HeaderValue::from_str(&format!("Bearer {}", token.expose())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    Some(value)
                }
                Err(_) => {
                    errors.push(ValidationError::InvalidToken);
                    None
                }
            },
            None => None,
        };

        let cors = &config.cors;
        let mut cors_headers = FixedHeaders::new();
        let max_age = cors.max_age_secs.to_string();
        for (name, field, value) in [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "cors.allow_origin", cors.allow_origin.as_str()),
            (ACCESS_CONTROL_ALLOW_METHODS, "cors.allow_methods", cors.allow_methods.as_str()),
            (ACCESS_CONTROL_ALLOW_HEADERS, "cors.allow_headers", cors.allow_headers.as_str()),
            (ACCESS_CONTROL_MAX_AGE, "cors.max_age_secs", max_age.as_str()),
        ] {
            if let Some(value) = header_value(field, value, &mut errors) {
                cors_headers.push(name, value);
            }
        }

        let mut additional_headers = FixedHeaders::new();
        let api_base = config
            .headers
            .api_base
            .as_deref()
            .unwrap_or(&config.upstream.base_url);
        if let Some(value) = header_value("headers.proxy_by", &config.headers.proxy_by, &mut errors) {
            additional_headers.push(X_PROXY_BY, value);
        }
        if let Some(value) = header_value("headers.api_base", api_base, &mut errors) {
            additional_headers.push(X_API_BASE, value);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            upstream_base_url: config.upstream.base_url.clone(),
            api_prefix: config.upstream.api_prefix.clone(),
            authorization,
            cors_headers,
            additional_headers,
            max_request_body_bytes: config.limits.max_request_body_bytes,
            connect_timeout: non_zero_secs(config.upstream.connect_timeout_secs),
            request_timeout: non_zero_secs(config.upstream.request_timeout_secs),
        })
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
