//! Property-based test generators using proptest.
//!
//! Provides strategies for demo events and append workloads. Generated text
//! always starts with an alphanumeric character and may contain markup
//! characters, so escaping is exercised without producing blank elements.

use crate::events::{
    AddressChanged, Batch, Change, EmailVerified, Envelope, PostalAddress, Tick, UserCreated,
};
use atomlog_codec::Payload;
use chrono::{DateTime, FixedOffset, TimeZone};
use proptest::prelude::*;
use uuid::Uuid;

/// Strategy for non-nil UUIDs.
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    (1u128..).prop_map(Uuid::from_u128)
}

/// Strategy for short text, including characters that need escaping.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9][a-zA-Z0-9 &<>'\"]{0,15}").expect("Invalid regex")
}

/// Strategy for timestamps with whole-hour offsets and nanosecond
/// precision.
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000, -12i32..=14).prop_filter_map(
        "timestamp must be representable",
        |(secs, nanos, hours)| {
            FixedOffset::east_opt(hours * 3600)?
                .timestamp_opt(secs, nanos)
                .single()
        },
    )
}

/// Strategy for [`UserCreated`].
pub fn user_created_strategy() -> impl Strategy<Value = UserCreated> {
    (uuid_strategy(), text_strategy(), timestamp_strategy()).prop_map(|(user_id, name, at)| {
        UserCreated {
            user_id,
            homepage: format!("https://example.com/u/{}", user_id.simple()),
            name,
            created_at: at,
        }
    })
}

/// Strategy for [`EmailVerified`].
pub fn email_verified_strategy() -> impl Strategy<Value = EmailVerified> {
    (uuid_strategy(), "[a-z]{1,8}@[a-z]{1,8}\\.com")
        .prop_map(|(user_id, email)| EmailVerified { user_id, email })
}

/// Strategy for [`AddressChanged`].
pub fn address_changed_strategy() -> impl Strategy<Value = AddressChanged> {
    (
        uuid_strategy(),
        text_strategy(),
        text_strategy(),
        prop::option::of("[0-9]{5}"),
    )
        .prop_map(|(user_id, street, city, postcode)| AddressChanged {
            user_id,
            address: PostalAddress {
                street,
                city,
                postcode,
            },
        })
}

/// Strategy for one [`Change`].
pub fn change_strategy() -> impl Strategy<Value = Change> {
    prop_oneof![
        (text_strategy(), text_strategy()).prop_map(|(from, to)| Change::Renamed { from, to }),
        prop::option::of(text_strategy()).prop_map(|reason| Change::Removed { reason }),
        Just(Change::Touched),
    ]
}

/// Strategy for [`Batch`] with zero to five changes.
pub fn batch_strategy() -> impl Strategy<Value = Batch> {
    (text_strategy(), prop::collection::vec(change_strategy(), 0..5))
        .prop_map(|(source, changes)| Batch { source, changes })
}

/// Any demo event.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoEvent {
    /// A [`UserCreated`].
    UserCreated(UserCreated),
    /// An [`EmailVerified`].
    EmailVerified(EmailVerified),
    /// An [`AddressChanged`].
    AddressChanged(AddressChanged),
    /// An enveloped [`UserCreated`].
    EnvelopedUser(Envelope<UserCreated>),
    /// An enveloped [`EmailVerified`].
    EnvelopedEmail(Envelope<EmailVerified>),
    /// A [`Batch`].
    Batch(Batch),
    /// A [`Tick`].
    Tick(Tick),
}

impl DemoEvent {
    /// Wraps the event as a payload.
    pub fn to_payload(&self) -> Payload {
        match self {
            Self::UserCreated(e) => Payload::new(e.clone()),
            Self::EmailVerified(e) => Payload::new(e.clone()),
            Self::AddressChanged(e) => Payload::new(e.clone()),
            Self::EnvelopedUser(e) => Payload::new(e.clone()),
            Self::EnvelopedEmail(e) => Payload::new(e.clone()),
            Self::Batch(e) => Payload::new(e.clone()),
            Self::Tick(e) => Payload::new(*e),
        }
    }
}

/// Strategy for any demo event.
pub fn demo_event_strategy() -> impl Strategy<Value = DemoEvent> {
    prop_oneof![
        user_created_strategy().prop_map(DemoEvent::UserCreated),
        email_verified_strategy().prop_map(DemoEvent::EmailVerified),
        address_changed_strategy().prop_map(DemoEvent::AddressChanged),
        (uuid_strategy(), user_created_strategy()).prop_map(|(correlation_id, body)| {
            DemoEvent::EnvelopedUser(Envelope {
                correlation_id,
                body,
            })
        }),
        (uuid_strategy(), email_verified_strategy()).prop_map(|(correlation_id, body)| {
            DemoEvent::EnvelopedEmail(Envelope {
                correlation_id,
                body,
            })
        }),
        batch_strategy().prop_map(DemoEvent::Batch),
        any::<u64>().prop_map(|n| DemoEvent::Tick(Tick { n })),
    ]
}

/// Strategy for an append workload: a page size and a number of appends.
pub fn workload_strategy() -> impl Strategy<Value = (usize, u64)> {
    (1usize..6, 0u64..30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::convention_serializer;
    use atomlog_codec::ContentSerializer;

    proptest! {
        #[test]
        fn demo_events_survive_the_codec(event in demo_event_strategy()) {
            let codec = convention_serializer();
            let payload = event.to_payload();
            let element = codec.serialize(&payload).unwrap();
            let xml = element.to_xml_string().unwrap();
            let parsed = atomlog_codec::XmlElement::parse(&xml).unwrap();
            prop_assert_eq!(codec.deserialize(&parsed).unwrap(), payload);
        }

        #[test]
        fn uuids_are_never_nil(id in uuid_strategy()) {
            prop_assert!(!id.is_nil());
        }
    }
}
