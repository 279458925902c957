//! The event stream facade.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::id::FeedId;
use crate::reader::{BackwardReader, ForwardReader, ReadContext};
use crate::storage::AtomEventStorage;
use crate::writer::PageWriter;
use atomlog_codec::{ContentSerializer, Event, Payload};
use std::sync::Arc;
use tokio::task::{self, JoinHandle};
use uuid::Uuid;

/// An append-only event stream stored as a chain of Atom pages.
///
/// `EventStream` ties a stream identifier to a storage provider and a
/// content codec. It is cheap to clone; clones share the collaborators.
///
/// # Example
///
/// ```rust
/// use atomlog_codec::{ConventionSerializer, TypeCatalog};
/// use atomlog_core::{EventStream, FeedId, InMemoryStorage};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Deposited {
///     amount: i64,
/// }
///
/// let stream = EventStream::builder(FeedId::new_id())
///     .storage(InMemoryStorage::in_memory())
///     .serializer(ConventionSerializer::new(TypeCatalog::new().with::<Deposited>()))
///     .page_size(10)
///     .build()
///     .unwrap();
///
/// stream.append(Deposited { amount: 5 }).unwrap();
/// stream.append(Deposited { amount: 7 }).unwrap();
///
/// let amounts: Vec<i64> = stream
///     .forward()
///     .iter()
///     .map(|p| p.unwrap().downcast_ref::<Deposited>().unwrap().amount)
///     .collect();
/// assert_eq!(amounts, vec![5, 7]);
/// ```
#[derive(Clone)]
pub struct EventStream {
    id: FeedId,
    storage: Arc<dyn AtomEventStorage>,
    codec: Arc<dyn ContentSerializer>,
    config: Config,
}

impl EventStream {
    /// Starts building a stream with the given identifier.
    #[must_use]
    pub fn builder(id: FeedId) -> EventStreamBuilder {
        EventStreamBuilder::new(id)
    }

    /// The stream identifier.
    #[must_use]
    pub fn id(&self) -> FeedId {
        self.id
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Appends an event and returns the id of the entry that holds it.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage call fails or a page cannot be
    /// encoded or decoded.
    pub fn append<T: Event>(&self, event: T) -> CoreResult<Uuid> {
        self.append_payload(Payload::new(event))
    }

    /// Appends an already wrapped payload.
    ///
    /// # Errors
    ///
    /// See [`EventStream::append`].
    pub fn append_payload(&self, payload: Payload) -> CoreResult<Uuid> {
        PageWriter::new(self.storage.as_ref(), self.codec.as_ref(), &self.config)
            .append(self.id, payload)
    }

    /// A reader from the oldest event to the newest.
    #[must_use]
    pub fn forward(&self) -> ForwardReader {
        ForwardReader::new(self.read_context())
    }

    /// A reader from the newest event to the oldest.
    #[must_use]
    pub fn backward(&self) -> BackwardReader {
        BackwardReader::new(self.read_context())
    }

    /// Appends on tokio's blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn append_async<T: Event>(&self, event: T) -> JoinHandle<CoreResult<Uuid>> {
        let stream = self.clone();
        let payload = Payload::new(event);
        task::spawn_blocking(move || stream.append_payload(payload))
    }

    /// Replays oldest to newest on tokio's blocking pool, collecting every
    /// payload.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn read_forward_async(&self) -> JoinHandle<CoreResult<Vec<Payload>>> {
        let reader = self.forward();
        task::spawn_blocking(move || reader.iter().collect())
    }

    /// Replays newest to oldest on tokio's blocking pool, collecting every
    /// payload.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn read_backward_async(&self) -> JoinHandle<CoreResult<Vec<Payload>>> {
        let reader = self.backward();
        task::spawn_blocking(move || reader.iter().collect())
    }

    fn read_context(&self) -> ReadContext {
        ReadContext {
            stream: self.id,
            storage: Arc::clone(&self.storage),
            codec: Arc::clone(&self.codec),
            prefetch: self.config.prefetch,
        }
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Flattens the result of an async handle.
///
/// # Errors
///
/// Returns [`CoreError::TaskFailed`] if the task panicked or was cancelled,
/// otherwise the task's own result.
pub async fn join<T>(handle: JoinHandle<CoreResult<T>>) -> CoreResult<T> {
    handle.await?
}

/// Builder for [`EventStream`].
#[must_use]
pub struct EventStreamBuilder {
    id: FeedId,
    storage: Option<Arc<dyn AtomEventStorage>>,
    codec: Option<Arc<dyn ContentSerializer>>,
    config: Config,
}

impl EventStreamBuilder {
    fn new(id: FeedId) -> Self {
        Self {
            id,
            storage: None,
            codec: None,
            config: Config::default(),
        }
    }

    /// Sets the storage provider.
    pub fn storage(self, storage: impl AtomEventStorage + 'static) -> Self {
        self.shared_storage(Arc::new(storage))
    }

    /// Sets a storage provider shared with other streams.
    pub fn shared_storage(mut self, storage: Arc<dyn AtomEventStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the content codec.
    pub fn serializer(self, codec: impl ContentSerializer + 'static) -> Self {
        self.shared_serializer(Arc::new(codec))
    }

    /// Sets a content codec shared with other streams.
    pub fn shared_serializer(mut self, codec: Arc<dyn ContentSerializer>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.config = self.config.page_size(size);
        self
    }

    /// Builds the stream.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingCollaborator`] if no storage or no
    /// serializer was set, and [`CoreError::InvalidArgument`] if the page
    /// size is zero.
    pub fn build(self) -> CoreResult<EventStream> {
        let storage = self
            .storage
            .ok_or_else(|| CoreError::missing_collaborator("storage"))?;
        let codec = self
            .codec
            .ok_or_else(|| CoreError::missing_collaborator("serializer"))?;
        self.config.validate()?;
        Ok(EventStream {
            id: self.id,
            storage,
            codec,
            config: self.config,
        })
    }
}
