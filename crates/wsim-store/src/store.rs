//! The `RecordStore` trait implemented by every backend.

use crate::{Fields, Query, Record, StoreResult};

/// A keyed object store with field-scoped queries.
///
/// Records are keyed by `(kind, id)`.  Ids are chosen by the caller.
pub trait RecordStore: Send {
    /// Insert a new record.  Fails with `Duplicate` if the key is taken.
    fn create(&mut self, record: Record) -> StoreResult<()>;

    /// Overwrite the named fields of an existing record, keeping the rest.
    fn update(&mut self, kind: &str, id: u64, fields: Fields) -> StoreResult<()>;

    fn find(&self, query: &Query) -> StoreResult<Vec<Record>>;

    fn count(&self, query: &Query) -> StoreResult<usize>;

    /// Remove a record.  Returns `false` if it did not exist.
    fn delete(&mut self, kind: &str, id: u64) -> StoreResult<bool>;

    fn get(&self, kind: &str, id: u64) -> StoreResult<Option<Record>>;

    /// Make everything written so far durable.  No-op by default.
    fn sync(&mut self) -> StoreResult<()> {
        Ok(())
    }
}
