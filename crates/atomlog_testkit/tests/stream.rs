//! Builder validation and async task handles.

use atomlog_core::{join, Config, CoreError, EventStream, FeedId, InMemoryStorage};
use atomlog_testkit::prelude::*;
use std::sync::Arc;

#[test]
fn builder_names_missing_collaborators() {
    let missing_storage = EventStream::builder(FeedId::new_id())
        .serializer(convention_serializer())
        .build();
    assert!(matches!(
        missing_storage,
        Err(CoreError::MissingCollaborator { name: "storage" })
    ));

    let missing_serializer = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .build();
    assert!(matches!(
        missing_serializer,
        Err(CoreError::MissingCollaborator { name: "serializer" })
    ));
}

#[test]
fn builder_rejects_zero_page_size() {
    let result = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(convention_serializer())
        .config(Config::new().page_size(0))
        .build();
    assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
}

#[test]
fn prefetch_can_be_disabled() {
    let stream = EventStream::builder(FeedId::new_id())
        .storage(InMemoryStorage::in_memory())
        .serializer(convention_serializer())
        .config(Config::new().page_size(1).prefetch(false))
        .build()
        .unwrap();
    for n in 0..4 {
        stream.append(Tick { n }).unwrap();
    }
    assert_eq!(stream.forward().iter().count(), 4);
    assert_eq!(stream.backward().iter().count(), 4);
}

#[tokio::test]
async fn async_append_and_replay() {
    let test = TestStream::memory(2);
    for n in 0..5 {
        join(test.append_async(Tick { n })).await.unwrap();
    }
    let forward: Vec<u64> = join(test.read_forward_async())
        .await
        .unwrap()
        .iter()
        .map(|p| p.downcast_ref::<Tick>().unwrap().n)
        .collect();
    assert_eq!(forward, vec![0, 1, 2, 3, 4]);

    let backward: Vec<u64> = join(test.read_backward_async())
        .await
        .unwrap()
        .iter()
        .map(|p| p.downcast_ref::<Tick>().unwrap().n)
        .collect();
    assert_eq!(backward, vec![4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn different_streams_append_concurrently() {
    let storage: Arc<dyn atomlog_core::AtomEventStorage> =
        Arc::new(InMemoryStorage::in_memory());
    let streams: Vec<EventStream> = (0..4)
        .map(|_| build(FeedId::new_id(), Arc::clone(&storage), 3))
        .collect();

    let mut handles = Vec::new();
    for stream in &streams {
        let stream = stream.clone();
        handles.push(tokio::spawn(async move {
            for n in 0..10 {
                join(stream.append_async(Tick { n })).await?;
            }
            Ok::<_, CoreError>(())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for stream in &streams {
        assert_eq!(page_sizes(storage.as_ref(), stream.id()), vec![3, 3, 3, 1]);
    }
}

#[tokio::test]
async fn failed_task_surfaces_error() {
    let storage = Arc::new(CrashingStorage::new(Arc::new(InMemoryStorage::in_memory())));
    storage.arm(CrashPoint::AfterNewPage);
    let stream = build(FeedId::new_id(), storage, 2);
    assert!(matches!(
        join(stream.append_async(Tick { n: 0 })).await,
        Err(CoreError::Storage(_))
    ));
}
