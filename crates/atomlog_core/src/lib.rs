//! # atomlog Core
//!
//! An append-only event log persisted as a chain of Atom feed pages.
//!
//! This crate provides:
//! - The Atom document model ([`Feed`], [`Entry`], [`Link`], [`Author`])
//! - The storage contract ([`AtomEventStorage`]) and adapters over
//!   `atomlog_storage` document stores
//! - Appending with automatic pagination and self-healing of stale links
//! - Forward and backward replay with background page prefetch
//! - The [`EventStream`] facade and its builder
//!
//! Payloads are encoded by an `atomlog_codec` [`ContentSerializer`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod config;
mod error;
mod id;
pub mod model;
pub mod reader;
mod storage;
mod stream;
mod writer;

pub use atomlog_codec::{ContentSerializer, Payload};
pub use config::{Config, DEFAULT_AUTHOR, DEFAULT_PAGE_SIZE};
pub use error::{CoreError, CoreResult};
pub use id::FeedId;
pub use model::{Author, Entry, Feed, Link};
pub use reader::{BackwardReader, Events, ForwardReader};
pub use storage::{
    read_feed, write_feed, AtomEventStorage, DocumentStorage, FileStorage, InMemoryStorage,
};
pub use stream::{join, EventStream, EventStreamBuilder};
pub use writer::PageWriter;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
