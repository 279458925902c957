//! Error types for atomlog core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in atomlog core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage provider error, propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] atomlog_storage::StorageError),

    /// Content codec error.
    #[error("codec error: {0}")]
    Codec(#[from] atomlog_codec::CodecError),

    /// An argument was rejected, e.g. the nil UUID as an identifier.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A feed document does not have the expected shape.
    #[error("invalid feed format: {message}")]
    InvalidFormat {
        /// Description of the format issue, naming the element or attribute.
        message: String,
    },

    /// A required collaborator was not supplied to a builder.
    #[error("missing collaborator: {name}")]
    MissingCollaborator {
        /// Name of the collaborator.
        name: &'static str,
    },

    /// A background unit of work panicked or was cancelled.
    #[error("task failed: {message}")]
    TaskFailed {
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a missing collaborator error.
    pub fn missing_collaborator(name: &'static str) -> Self {
        Self::MissingCollaborator { name }
    }

    /// Creates a task failure error.
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::task_failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = CoreError::invalid_format("link without href");
        assert_eq!(err.to_string(), "invalid feed format: link without href");

        let err = CoreError::missing_collaborator("storage");
        assert_eq!(err.to_string(), "missing collaborator: storage");
    }

    #[test]
    fn storage_errors_convert() {
        let err: CoreError = atomlog_storage::StorageError::invalid_address("x/y/z").into();
        assert!(matches!(err, CoreError::Storage(_)));
    }
}
