//! Proximity Storage - Persistence for circles and graphs
//!
//! This crate provides storage backends for the circles, run summaries and
//! graph snapshots produced by an expansion run.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod json;
pub mod memory;
pub mod traits;

#[cfg(feature = "redb")]
pub mod redb;

pub use error::{StorageError, StorageResult};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{sanitize_key, CircleStore};

#[cfg(feature = "redb")]
pub use redb::RedbStore;
