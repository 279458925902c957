//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The address is not of the form `<uuid>` or `<segment>/<uuid>`.
    #[error("invalid address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// A stored document is not valid UTF-8.
    #[error("document at {address} is not valid UTF-8")]
    InvalidUtf8 {
        /// Address of the offending document.
        address: String,
    },

    /// The store's on-disk layout is damaged.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates an invalid address error.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }
}
