//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream origin and how requests are rewritten for it.
    pub upstream: UpstreamConfig,

    /// Fixed CORS headers attached to every response.
    pub cors: CorsConfig,

    /// Implementation-identifying headers attached to every response.
    pub headers: AdditionalHeadersConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address as an IP literal and port (e.g., "0.0.0.0:8080", "[::1]:8080").
    /// Host names such as "localhost:8080" are rejected; no DNS lookup happens at startup.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin every forwarded request goes to (e.g., "https://dev.ipes.tech").
    /// Required; there is no usable default.
    pub base_url: String,

    /// Path prefix a request must carry to be proxied. Stripped before forwarding.
    pub api_prefix: String,

    /// Bearer token injected on every forwarded request.
    pub api_token: Option<Secret>,

    /// Connection establishment timeout in seconds (0 = transport default).
    pub connect_timeout_secs: u64,

    /// Total upstream exchange timeout in seconds (0 = none).
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_prefix: "/api".to_string(),
            api_token: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 0,
        }
    }
}

/// CORS header values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS, PATCH".to_string(),
            allow_headers: "Content-Type, Authorization, X-Requested-With, Accept, Origin"
                .to_string(),
            max_age_secs: 86_400, // 24 hours
        }
    }
}

/// Additional response headers identifying the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdditionalHeadersConfig {
    /// Value of `X-Proxy-By`.
    pub proxy_by: String,

    /// Value of `X-API-Base`. Falls back to `upstream.base_url`.
    pub api_base: Option<String>,
}

impl Default for AdditionalHeadersConfig {
    fn default() -> Self {
        Self {
            proxy_by: "api-cors-proxy".to_string(),
            api_base: None,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest inbound body buffered for forwarding, in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.upstream.api_prefix, "/api");
        assert!(config.upstream.api_token.is_none());
        assert_eq!(config.cors.allow_origin, "*");
        assert_eq!(config.cors.max_age_secs, 86_400);
        assert_eq!(config.headers.proxy_by, "api-cors-proxy");
        assert_eq!(config.observability.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "https://dev.ipes.tech"
            api_token = "s3cret"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "https://dev.ipes.tech");
        assert_eq!(config.upstream.api_prefix, "/api");
        assert_eq!(config.upstream.api_token.as_ref().map(Secret::expose), Some("s3cret"));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(
            config.cors.allow_methods,
            "GET, POST, PUT, DELETE, OPTIONS, PATCH"
        );
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let upstream = UpstreamConfig {
            api_token: Some(Secret::new("do-not-print")),
            ..UpstreamConfig::default()
        };
        let rendered = format!("{:?}", upstream);
        assert!(!rendered.contains("do-not-print"));
        assert!(rendered.contains("REDACTED"));
    }
}
