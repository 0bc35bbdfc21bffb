//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing span)
//!     → handler.rs (preflight / not found / forward)
//!     → request.rs (rewrite URL, filter headers, buffer body)
//!     → upstream (reqwest)
//!     → response.rs (filter headers, stamp CORS, stream body)
//!     → Send to client
//! ```

pub mod handler;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use handler::handle;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
