//! HTTP surface of the medication log.
//!
//! - [`server`]: the `axum` backend over a local [`medlog_db::Database`]
//! - [`client`]: a `reqwest` client for the same wire format
//!
//! `GET /medications` returns positional rows (`[id, medication, timestamp,
//! source, notes]`) for compatibility with existing front ends.

pub mod client;
pub mod server;
pub mod wire;

use thiserror::Error;

pub use client::Client;
pub use server::{AppState, router, serve};

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is unusable.
    #[error("invalid API URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
