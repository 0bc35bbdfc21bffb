//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty/compact for development
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default filter directives for a configured level.
pub fn default_directives(level: &str) -> String {
    format!("api_cors_proxy={level},tower_http={level}")
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}
