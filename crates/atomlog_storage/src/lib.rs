//! # atomlog Storage
//!
//! Document stores for atomlog feeds.
//!
//! This crate provides the lowest-level storage abstraction for atomlog.
//! Stores are **opaque document stores** - they map a relative address to
//! the bytes last written there and do not interpret those bytes.
//!
//! ## Design Principles
//!
//! - Stores are simple keyed documents (read, write, list)
//! - No knowledge of Atom feeds, links or pagination
//! - A write replaces the whole document (last write wins)
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral streams
//! - [`FileStore`] - One file per document under a root directory
//!
//! ## Example
//!
//! ```rust
//! use atomlog_storage::{Address, DocumentStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let address: Address = "0b5a7a4e-3a53-4b43-9d4e-2b2f8f2e3c11".parse().unwrap();
//! store.write(&address, b"<feed/>").unwrap();
//! assert_eq!(store.read(&address).unwrap(), Some(b"<feed/>".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod address;
mod error;
mod file;
mod memory;
mod store;

pub use address::Address;
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::DocumentStore;
