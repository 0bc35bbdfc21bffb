//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream origin and the path prefix
//! - Check that every fixed header value is legal on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::config::settings::ProxySettings;

/// A single semantic problem found in a [`ProxyConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url is required")]
    MissingUpstream,

    #[error("upstream.base_url {url:?} is invalid: {reason}")]
    InvalidUpstream { url: String, reason: String },

    #[error("upstream.base_url {0:?} must not end with '/'")]
    UpstreamTrailingSlash(String),

    #[error("upstream.api_prefix {0:?} must start with '/'")]
    InvalidPrefix(String),

    #[error("upstream.api_prefix {0:?} must not end with '/'")]
    PrefixTrailingSlash(String),

    #[error("upstream.api_token is not a valid header value")]
    InvalidToken,

    #[error("{field} is not a valid header value: {value:?}")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("listener.bind_address {0:?} is not an IP:port socket address")]
    InvalidBindAddress(String),

    #[error("limits.max_request_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    ProxySettings::from_config(config).map(|_| ())
}

/// Checks that do not produce a compiled value.
pub(crate) fn check_scalars(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_upstream(&config.upstream.base_url, errors);

    let prefix = &config.upstream.api_prefix;
    if !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    } else if prefix.ends_with('/') {
        // The remainder after the prefix must itself start with '/'.
        errors.push(ValidationError::PrefixTrailingSlash(prefix.clone()));
    }

    if config.limits.max_request_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
}

fn check_upstream(base_url: &str, errors: &mut Vec<ValidationError>) {
    if base_url.is_empty() {
        errors.push(ValidationError::MissingUpstream);
        return;
    }

    let invalid = |reason: &str| ValidationError::InvalidUpstream {
        url: base_url.to_string(),
        reason: reason.to_string(),
    };

    match Url::parse(base_url) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(invalid("scheme must be http or https"));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(invalid("query and fragment are not allowed"));
            }
        }
        Err(e) => errors.push(invalid(&e.to_string())),
    }

    if base_url.ends_with('/') {
        errors.push(ValidationError::UpstreamTrailingSlash(base_url.to_string()));
    }
}

/// Parse a configured header value, recording a failure against `field`.
pub(crate) fn header_value(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<HeaderValue> {
    match HeaderValue::from_str(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(ValidationError::InvalidHeaderValue {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
