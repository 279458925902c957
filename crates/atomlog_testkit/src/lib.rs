//! # atomlog Testkit
//!
//! Test utilities for atomlog.
//!
//! This crate provides:
//! - Test fixtures over in-memory and temporary file storage
//! - Demo event types covering the codec's payload shapes
//! - Property-based test generators using proptest
//! - Page chain inspection and invariant assertions
//! - Crash simulation between the writes of an append
//!
//! ## Usage
//!
//! ```rust
//! use atomlog_testkit::prelude::*;
//!
//! let test = TestStream::memory(2);
//! for n in 0..3 {
//!     test.append(Tick { n }).unwrap();
//! }
//! assert_eq!(page_sizes(test.storage.as_ref(), test.id()), vec![2, 1]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crash;
pub mod events;
pub mod fixtures;
pub mod generators;
pub mod inspect;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::crash::*;
    pub use crate::events::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::inspect::*;
}
