//! In-memory backend.

use std::collections::BTreeMap;

use crate::{Fields, Query, Record, RecordStore, StoreError, StoreResult};

/// Keeps every record in a `BTreeMap` keyed by `(kind, id)`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<(String, u64), Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    fn kind_range<'s>(&'s self, kind: &str) -> impl Iterator<Item = &'s Record> {
        self.records
            .range((kind.to_owned(), 0)..=(kind.to_owned(), u64::MAX))
            .map(|(_, r)| r)
    }
}

impl RecordStore for MemoryStore {
    fn create(&mut self, record: Record) -> StoreResult<()> {
        let key = (record.kind.clone(), record.id);
        if self.records.contains_key(&key) {
            return Err(StoreError::Duplicate { kind: key.0, id: key.1 });
        }
        self.records.insert(key, record);
        Ok(())
    }

    fn update(&mut self, kind: &str, id: u64, fields: Fields) -> StoreResult<()> {
        match self.records.get_mut(&(kind.to_owned(), id)) {
            Some(record) => {
                record.merge(fields);
                Ok(())
            }
            None => Err(StoreError::UnknownRecord { kind: kind.to_owned(), id }),
        }
    }

    fn find(&self, query: &Query) -> StoreResult<Vec<Record>> {
        Ok(query.apply(self.kind_range(&query.kind)))
    }

    fn count(&self, query: &Query) -> StoreResult<usize> {
        Ok(query.count(self.kind_range(&query.kind)))
    }

    fn delete(&mut self, kind: &str, id: u64) -> StoreResult<bool> {
        Ok(self.records.remove(&(kind.to_owned(), id)).is_some())
    }

    fn get(&self, kind: &str, id: u64) -> StoreResult<Option<Record>> {
        Ok(self.records.get(&(kind.to_owned(), id)).cloned())
    }
}
