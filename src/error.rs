//! Error types for TreeKV
//!
//! Provides a unified error type for all operations.
//!
//! The `Display` text of the domain variants doubles as the `reason` string
//! sent back to clients, so it must stay stable.

use thiserror::Error;

/// Result type alias using TreeKvError
pub type Result<T> = std::result::Result<T, TreeKvError>;

/// Unified error type for TreeKV operations
#[derive(Debug, Error)]
pub enum TreeKvError {
    // -------------------------------------------------------------------------
    // Domain Errors (reported to the client as ERROR responses)
    // -------------------------------------------------------------------------
    #[error("No such key")]
    NoSuchKey,

    #[error("Storage is full!")]
    StorageFull,

    #[error("Unknown command!")]
    UnknownCommand,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Frame too large: {0} bytes (max {max})", max = u16::MAX)]
    FrameTooLarge(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TreeKvError {
    /// Whether this error is recovered into an ERROR response.
    ///
    /// Everything else abandons the exchange.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            TreeKvError::NoSuchKey
                | TreeKvError::StorageFull
                | TreeKvError::UnknownCommand
                | TreeKvError::MalformedRequest(_)
        )
    }
}
