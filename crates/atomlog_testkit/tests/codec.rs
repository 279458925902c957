//! Payload shapes round-trip through a stream.

use atomlog_codec::{ContentSerializer, Payload, TypeCatalog};
use atomlog_core::{CoreError, EventStream, FeedId, InMemoryStorage};
use atomlog_testkit::prelude::*;
use uuid::Uuid;

fn replay(stream: &EventStream) -> Vec<Payload> {
    stream.forward().iter().map(Result::unwrap).collect()
}

#[test]
fn every_demo_shape_roundtrips_through_pages() {
    let test = TestStream::memory(3);
    let created = user_created("grace");
    let events = vec![
        Payload::new(created.clone()),
        Payload::new(EmailVerified {
            user_id: created.user_id,
            email: "grace@example.com".into(),
        }),
        Payload::new(AddressChanged {
            user_id: created.user_id,
            address: PostalAddress {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                postcode: None,
            },
        }),
        Payload::new(Envelope {
            correlation_id: Uuid::new_v4(),
            body: created.clone(),
        }),
        Payload::new(Envelope {
            correlation_id: Uuid::new_v4(),
            body: EmailVerified {
                user_id: created.user_id,
                email: "g@example.com".into(),
            },
        }),
        Payload::new(Batch {
            source: "import".into(),
            changes: vec![
                Change::Renamed {
                    from: "a".into(),
                    to: "b".into(),
                },
                Change::Touched,
                Change::Removed {
                    reason: Some("dup".into()),
                },
            ],
        }),
        Payload::new(Batch {
            source: "empty".into(),
            changes: vec![],
        }),
    ];
    for event in &events {
        test.append_payload(event.clone()).unwrap();
    }
    assert_eq!(replay(&test), events);
}

#[test]
fn uri_field_keeps_query_string() {
    let test = TestStream::memory(2);
    let created = user_created("ada");
    assert!(created.homepage.contains('&'));
    test.append(created.clone()).unwrap();
    let back = replay(&test);
    assert_eq!(back[0].downcast_ref::<UserCreated>(), Some(&created));
}

#[test]
fn generic_wrappers_decode_to_their_instantiation() {
    let test = TestStream::memory(2);
    let created = user_created("linus");
    test.append(Envelope {
        correlation_id: Uuid::new_v4(),
        body: created.clone(),
    })
    .unwrap();
    let back = replay(&test);
    assert!(back[0].is::<Envelope<UserCreated>>());
    assert!(!back[0].is::<Envelope<EmailVerified>>());
}

#[test]
fn unregistered_type_fails_on_read() {
    let stream = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(atomlog_codec::ConventionSerializer::new(
            TypeCatalog::new().with::<Tick>(),
        ))
        .build()
        .unwrap();
    stream.append(user_created("x")).unwrap();
    let mut events = stream.forward().iter();
    assert!(matches!(events.next(), Some(Err(CoreError::Codec(_)))));
    assert!(events.next().is_none());
}

#[test]
fn contract_serializer_drives_a_stream() {
    let stream = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(contract_serializer())
        .page_size(1)
        .build()
        .unwrap();
    let placed = OrderPlaced {
        order_id: Uuid::new_v4(),
        total: 1299,
    };
    let shipped = OrderShipped {
        order_id: placed.order_id,
        carrier: "Parcel & Co".into(),
    };
    stream.append(placed.clone()).unwrap();
    stream.append(shipped.clone()).unwrap();

    let back = replay(&stream);
    assert_eq!(back[0].downcast_ref::<OrderPlaced>(), Some(&placed));
    assert_eq!(back[1].downcast_ref::<OrderShipped>(), Some(&shipped));

    let element = contract_serializer().serialize(&back[0]).unwrap();
    assert_eq!(element.name, "OrderPlaced");
    assert_eq!(element.namespace, "http://example.com/orders/2024");
    assert_eq!(element.children[0].name, "OrderId");
}

#[test]
fn contract_serializer_rejects_unmapped_payloads() {
    let stream = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(contract_serializer())
        .build()
        .unwrap();
    assert!(matches!(
        stream.append(Tick { n: 1 }),
        Err(CoreError::Codec(_))
    ));
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum AccountEvent {
    Opened { owner: String },
    Credited(u64),
    Closed { reason: Option<String> },
}

#[test]
fn enum_payloads_survive_later_appends() {
    let stream = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(atomlog_codec::ConventionSerializer::new(
            TypeCatalog::new().with::<AccountEvent>(),
        ))
        .page_size(2)
        .build()
        .unwrap();
    let events = vec![
        AccountEvent::Opened {
            owner: "ada".into(),
        },
        AccountEvent::Credited(250),
        AccountEvent::Closed { reason: None },
    ];
    for event in &events {
        stream.append(event.clone()).unwrap();
    }

    let forward: Vec<AccountEvent> = replay(&stream)
        .iter()
        .map(|p| p.downcast_ref::<AccountEvent>().unwrap().clone())
        .collect();
    assert_eq!(forward, events);

    let backward: Vec<Payload> = stream.backward().iter().map(Result::unwrap).collect();
    assert_eq!(backward.len(), 3);
    assert_eq!(backward[0].downcast_ref::<AccountEvent>(), events.last());
}
