//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ProxyConfig, Secret};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream bearer token.
pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_UPSTREAM_URL: &str = "PROXY_UPSTREAM_URL";
pub const ENV_API_PREFIX: &str = "PROXY_API_PREFIX";
pub const ENV_BIND_ADDRESS: &str = "PROXY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a configuration file (or defaults), apply process environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ProxyConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay values found through `lookup` onto `config`. Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ProxyConfig, lookup: F) -> ProxyConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(token) = get(ENV_API_TOKEN) {
        config.upstream.api_token = Some(Secret::new(token));
    }
    if let Some(url) = get(ENV_UPSTREAM_URL) {
        config.upstream.base_url = url;
    }
    if let Some(prefix) = get(ENV_API_PREFIX) {
        config.upstream.api_prefix = prefix;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_win_over_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstream]
            base_url = "https://file.example.com"
            api_token = "from-file"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_API_TOKEN, "from-env"),
            (ENV_UPSTREAM_URL, "https://env.example.com"),
            (ENV_API_PREFIX, ""),
        ]
        .into_iter()
        .collect();
        let config = apply_env_overrides(config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.upstream.base_url, "https://env.example.com");
        assert_eq!(
            config.upstream.api_token.as_ref().map(Secret::expose),
            Some("from-env")
        );
        // Empty values leave the file/default untouched.
        assert_eq!(config.upstream.api_prefix, "/api");
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("[upstream\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingUpstream,
            ValidationError::InvalidPrefix("api".into()),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: upstream.base_url is required, upstream.api_prefix \"api\" must start with '/'"
        );
    }
}
