//! Error types for the codec crate.

use std::fmt::Display;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The markup itself is malformed.
    #[error("malformed XML: {message}")]
    Xml {
        /// Description of the markup error.
        message: String,
    },

    /// Well-formed XML with an unexpected shape.
    #[error("invalid content format: {message}")]
    Format {
        /// Description of the format problem.
        message: String,
    },

    /// An element identity could not be mapped to exactly one type.
    #[error("cannot resolve {identity}: {reason}")]
    Lookup {
        /// The unresolved identity, as `{namespace}local-name` or a type path.
        identity: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A required child element is absent.
    #[error("missing element for {name}")]
    MissingElement {
        /// Name of the field that had no matching element.
        name: String,
    },

    /// Leaf text could not be converted to the target type.
    #[error("cannot convert {value:?} to {target}")]
    Conversion {
        /// The offending text.
        value: String,
        /// Name of the target type.
        target: &'static str,
    },

    /// The value's shape cannot be represented.
    #[error("unsupported shape: {type_name}")]
    Unsupported {
        /// Name of the unsupported type or shape.
        type_name: String,
    },

    /// A message raised by a `Serialize`/`Deserialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    /// Create a malformed XML error.
    pub fn xml(message: impl Display) -> Self {
        Self::Xml {
            message: message.to_string(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a lookup error.
    pub fn lookup(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Lookup {
            identity: identity.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::MissingElement { name: name.into() }
    }

    /// Create a conversion error.
    pub fn conversion(value: impl Into<String>, target: &'static str) -> Self {
        Self::Conversion {
            value: value.into(),
            target,
        }
    }

    /// Create an unsupported shape error.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }
}

impl serde::ser::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl serde::de::Error for CodecError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self::missing_element(field)
    }
}
