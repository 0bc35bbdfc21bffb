//! Failures of the forward path.
//!
//! Every variant collapses into the same `500 Proxy Error` response; the
//! `Display` text becomes the `message` field of the JSON body.

use std::error::Error as _;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Building, sending, or receiving the upstream exchange failed.
    #[error("{}", describe(.0))]
    Upstream(#[from] reqwest::Error),

    /// The inbound body could not be read (or exceeded the size limit).
    #[error("failed to read request body: {0}")]
    RequestBody(#[from] axum::Error),
}

/// `reqwest` keeps the useful part (refused, DNS, ...) in the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, ProxyError>;
