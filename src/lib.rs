//! CORS-enabling API proxy library.
//!
//! Forwards requests under a path prefix to a single upstream origin and
//! stamps permissive CORS headers on every response.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{ProxyConfig, ProxySettings};
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
