//! Stream and page identifiers.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identity of an event stream or of one of its pages.
///
/// A `FeedId` wraps a non-nil UUID. Its textual form is the URN
/// `urn:uuid:<uuid>`; its storage address (href) is the bare hyphenated
/// UUID.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedId(Uuid);

impl FeedId {
    /// Creates an identifier from a UUID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] for the nil UUID.
    pub fn new(uuid: Uuid) -> CoreResult<Self> {
        if uuid.is_nil() {
            return Err(CoreError::invalid_argument(
                "the nil UUID is not a valid feed identifier",
            ));
        }
        Ok(Self(uuid))
    }

    /// Creates a fresh random identifier.
    #[must_use]
    pub fn new_id() -> Self {
        // Version 4 UUIDs always carry version bits, so this is never nil.
        Self(Uuid::new_v4())
    }

    /// Parses `urn:uuid:<uuid>` or a bare UUID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if the text is not a UUID or
    /// names the nil UUID.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let uuid = Uuid::parse_str(text.trim())
            .map_err(|e| CoreError::invalid_argument(format!("{text:?} is not a UUID: {e}")))?;
        Self::new(uuid)
    }

    /// Parses the last path segment of a storage address.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] if that segment is not a
    /// valid identifier.
    pub fn from_href(href: &str) -> CoreResult<Self> {
        let last = href.rsplit('/').next().unwrap_or(href);
        Self::parse(last)
    }

    /// The relative storage address of the feed this identifies.
    #[must_use]
    pub fn href(&self) -> String {
        self.0.hyphenated().to_string()
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedId({})", self.0)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.urn())
    }
}

impl FromStr for FeedId {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<Uuid> for FeedId {
    type Error = CoreError;

    fn try_from(uuid: Uuid) -> CoreResult<Self> {
        Self::new(uuid)
    }
}

impl From<FeedId> for Uuid {
    fn from(id: FeedId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nil_is_rejected() {
        assert!(matches!(
            FeedId::new(Uuid::nil()),
            Err(CoreError::InvalidArgument { .. })
        ));
        assert!(FeedId::parse("urn:uuid:00000000-0000-0000-0000-000000000000").is_err());
        assert!(FeedId::try_from(Uuid::nil()).is_err());
    }

    #[test]
    fn new_id_is_unique_and_not_nil() {
        let a = FeedId::new_id();
        let b = FeedId::new_id();
        assert_ne!(a, b);
        assert!(!a.as_uuid().is_nil());
    }

    #[test]
    fn display_is_urn() {
        let uuid = Uuid::parse_str("6f1b3e4a-9c2d-4b8e-a1f0-0123456789ab").unwrap();
        let id = FeedId::new(uuid).unwrap();
        assert_eq!(id.to_string(), "urn:uuid:6f1b3e4a-9c2d-4b8e-a1f0-0123456789ab");
        assert_eq!(id.href(), "6f1b3e4a-9c2d-4b8e-a1f0-0123456789ab");
    }

    #[test]
    fn parse_accepts_urn_and_bare_forms() {
        let id = FeedId::new_id();
        assert_eq!(id.to_string().parse::<FeedId>().unwrap(), id);
        assert_eq!(FeedId::parse(&id.href()).unwrap(), id);
        assert!(FeedId::parse("urn:uuid:not-a-uuid").is_err());
    }

    #[test]
    fn from_href_takes_last_segment() {
        let id = FeedId::new_id();
        assert_eq!(FeedId::from_href(&id.href()).unwrap(), id);
        assert_eq!(FeedId::from_href(&format!("index/{}", id.href())).unwrap(), id);
        assert!(FeedId::from_href("index/").is_err());
    }

    #[test]
    fn uuid_conversions() {
        let id = FeedId::new_id();
        let uuid: Uuid = id.into();
        assert_eq!(FeedId::try_from(uuid).unwrap(), id);
    }

    proptest! {
        #[test]
        fn urn_roundtrip(value in 1u128..) {
            let id = FeedId::new(Uuid::from_u128(value)).unwrap();
            prop_assert_eq!(FeedId::parse(&id.to_string()).unwrap(), id);
        }
    }
}
