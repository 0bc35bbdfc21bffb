//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → settings.rs (compile into ProxySettings)
//!     → shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults except the upstream origin
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdditionalHeadersConfig, CorsConfig, LimitsConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, ProxyConfig, Secret, UpstreamConfig,
};
pub use settings::ProxySettings;
pub use validation::{validate_config, ValidationError};
