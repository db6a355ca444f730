//! `wsim-store`: record persistence for the `wsim` world engine.
//!
//! The scheduler never talks to a database directly.  It queues
//! [`Record`] writes on a [`WriteQueue`] and flushes them into whatever
//! [`RecordStore`] it was built with, once per pass.
//!
//! | Backend          | Feature   | Storage                                        |
//! |------------------|-----------|------------------------------------------------|
//! | [`MemoryStore`]  | *(none)*  | `BTreeMap` in process memory                   |
//! | [`JournalStore`] | *(none)*  | append-only CSV change log, replayed on open   |
//! | `SqliteStore`    | `sqlite`  | one `records` table, fields as JSON            |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wsim_store::{MemoryStore, Query, Record, RecordStore, WriteQueue};
//!
//! let mut store = MemoryStore::new();
//! let mut queue = WriteQueue::new();
//! queue.create(Record::new("action", 1).with("state", "pending"));
//! queue.flush(&mut store)?;
//! let pending = store.count(&Query::new("action").eq("state", "pending"))?;
//! ```

pub mod error;
pub mod journal;
pub mod memory;
pub mod query;
pub mod queue;
pub mod record;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use journal::JournalStore;
pub use memory::MemoryStore;
pub use query::{Filter, Query, SortOrder};
pub use queue::{Write, WriteQueue};
pub use record::{Fields, Record};
pub use store::RecordStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
