//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / server
//!     → tracing events and per-request spans (request ID, method, path)
//!     → logging.rs (tracing-subscriber: compact, pretty or JSON to stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
