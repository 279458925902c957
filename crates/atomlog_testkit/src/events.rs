//! Demo event types.
//!
//! Together they exercise every payload shape the convention codec
//! supports: scalars, URN-rendered identifiers, timestamps, nested records,
//! optional fields, single-parameter generic wrappers, trailing collections
//! and polymorphic items.

use atomlog_codec::{ConventionSerializer, ContractSerializer, DataContract, TypeCatalog};
use atomlog_codec::TypeResolutionTable;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreated {
    /// Account id.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Profile URI.
    pub homepage: String,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

/// A user confirmed an email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailVerified {
    /// Account id.
    pub user_id: Uuid,
    /// The verified address.
    pub email: String,
}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// Postal code, if known.
    pub postcode: Option<String>,
}

/// A user moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressChanged {
    /// Account id.
    pub user_id: Uuid,
    /// The new address.
    pub address: PostalAddress,
}

/// Wraps one event with delivery metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Correlates the envelope with a request.
    pub correlation_id: Uuid,
    /// The wrapped event.
    pub body: T,
}

/// One change inside a [`Batch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// A field was renamed.
    Renamed {
        /// Previous name.
        from: String,
        /// New name.
        to: String,
    },
    /// A record was removed.
    Removed {
        /// Why it was removed.
        reason: Option<String>,
    },
    /// A record was touched without changes.
    Touched,
}

/// Several changes applied together; the changes form the variable-length
/// tail of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Who applied the batch.
    pub source: String,
    /// The changes, in order.
    pub changes: Vec<Change>,
}

/// A simple counter tick, used where only ordering matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Sequence number.
    pub n: u64,
}

/// An order placed through a fixed element mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderPlaced {
    /// Order id.
    pub order_id: Uuid,
    /// Total in cents.
    pub total: i64,
}

impl DataContract for OrderPlaced {
    const NAME: &'static str = "OrderPlaced";
    const NAMESPACE: &'static str = "http://example.com/orders/2024";
}

/// An order shipped, through a fixed element mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderShipped {
    /// Order id.
    pub order_id: Uuid,
    /// Carrier name.
    pub carrier: String,
}

impl DataContract for OrderShipped {
    const NAME: &'static str = "OrderShipped";
    const NAMESPACE: &'static str = "http://example.com/orders/2024";
}

/// A catalog holding every convention-coded demo event.
#[must_use]
pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with::<UserCreated>()
        .with::<EmailVerified>()
        .with::<AddressChanged>()
        .with::<Envelope<UserCreated>>()
        .with::<Envelope<EmailVerified>>()
        .with::<Batch>()
        .with::<Tick>()
}

/// A convention serializer over [`catalog`].
#[must_use]
pub fn convention_serializer() -> ConventionSerializer {
    ConventionSerializer::new(catalog())
}

/// A contract serializer for the order events.
#[must_use]
pub fn contract_serializer() -> ContractSerializer {
    ContractSerializer::new(
        TypeResolutionTable::new()
            .register::<OrderPlaced>()
            .register::<OrderShipped>(),
    )
}

/// A sample [`UserCreated`].
#[must_use]
pub fn user_created(name: &str) -> UserCreated {
    UserCreated {
        user_id: Uuid::new_v4(),
        name: name.to_string(),
        homepage: format!("https://example.com/users/{name}?tab=profile&lang=en"),
        created_at: chrono::Utc::now().fixed_offset(),
    }
}
