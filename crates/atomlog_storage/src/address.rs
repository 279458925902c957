//! Relative document addresses.

use crate::error::{StorageError, StorageResult};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A relative document address.
///
/// Two shapes are accepted:
///
/// - `<uuid>` - a feed addressed directly by its id
/// - `<segment>/<uuid>` - the same feed nested one segment deeper, which lets
///   a store expose a group of feeds as separately enumerable
///
/// Segments are restricted to ASCII alphanumerics, `-` and `_`, so an address
/// can never escape the root of a [`crate::FileStore`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    segment: Option<String>,
    id: Uuid,
}

impl Address {
    /// Creates an address for a feed id with no segment.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self { segment: None, id }
    }

    /// Creates an address nested under `segment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is empty or contains characters other
    /// than ASCII alphanumerics, `-` and `_`.
    pub fn with_segment(segment: impl Into<String>, id: Uuid) -> StorageResult<Self> {
        let segment = segment.into();
        if !is_valid_segment(&segment) {
            return Err(StorageError::invalid_address(format!("{segment}/{id}")));
        }
        Ok(Self {
            segment: Some(segment),
            id,
        })
    }

    /// Parses an address string.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidAddress`] if the string is not of the
    /// form `<uuid>` or `<segment>/<uuid>`.
    pub fn parse(address: &str) -> StorageResult<Self> {
        let invalid = || StorageError::invalid_address(address);
        let mut parts = address.split('/');
        let (segment, id) = match (parts.next(), parts.next(), parts.next()) {
            (Some(id), None, None) => (None, id),
            (Some(segment), Some(id), None) => (Some(segment), id),
            _ => return Err(invalid()),
        };

        let id = Uuid::parse_str(id).map_err(|_| invalid())?;
        match segment {
            Some(segment) if is_valid_segment(segment) => Ok(Self {
                segment: Some(segment.to_string()),
                id,
            }),
            Some(_) => Err(invalid()),
            None => Ok(Self::new(id)),
        }
    }

    /// Returns the segment, if any.
    #[must_use]
    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    /// Returns the feed id this address points at.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.segment {
            Some(segment) => write!(f, "{segment}/{}", self.id.hyphenated()),
            None => write!(f, "{}", self.id.hyphenated()),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
