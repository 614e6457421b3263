//! Catalog-Worker: a resumable product-catalog crawler worker
//!
//! This crate implements a worker process that enumerates a paginated, faceted
//! product listing and extracts structured product records from detail pages.
//! All network access is delegated to a host process over a line-delimited JSON
//! protocol on stdin/stdout.

pub mod config;
pub mod crawler;
pub mod state;
pub mod transport;

use thiserror::Error;

/// Main error type for worker operations
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("Invalid enumeration state '{0}'")]
    InvalidState(String),

    #[error("Expected markup missing: {context}")]
    MissingNode { context: String },

    #[error("Host closed the channel")]
    ChannelClosed,
}

impl WorkerError {
    /// Returns true if the host ended the conversation rather than the worker failing
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, Self::ChannelClosed)
    }
}

/// Errors on the transport channel
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed JSON line '{line}': {source}")]
    Malformed {
        line: String,
        source: serde_json::Error,
    },

    #[error("Channel closed before line terminator ({0} bytes pending)")]
    Truncated(usize),

    #[error("Message is missing field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Site profile errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid URL template '{0}'")]
    InvalidTemplate(String),

    #[error("Invalid URL in profile: {0}")]
    InvalidUrl(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Result type alias for profile operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::SiteProfile;
pub use crawler::{Dispatcher, Outcome, ProductRecord, Selectors};
pub use state::EnumerationState;
