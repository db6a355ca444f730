//! `WriteQueue`: batches mutations and applies them at a flush boundary.
//!
//! Writes to the same key coalesce while they wait:
//!
//! | Queued          | Then pushed | Result                         |
//! |-----------------|-------------|--------------------------------|
//! | create          | update      | one create with merged fields  |
//! | update          | update      | one update with merged fields  |
//! | create          | delete      | nothing                        |
//! | update          | delete      | delete                         |
//!
//! Everything else queues in arrival order.

use std::collections::BTreeMap;

use crate::{Fields, Record, RecordStore, StoreResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    Create(Record),
    Update { kind: String, id: u64, fields: Fields },
    Delete { kind: String, id: u64 },
}

impl Write {
    pub fn key(&self) -> (&str, u64) {
        match self {
            Write::Create(r)                => (&r.kind, r.id),
            Write::Update { kind, id, .. }  => (kind, *id),
            Write::Delete { kind, id }      => (kind, *id),
        }
    }

    fn apply(self, store: &mut dyn RecordStore) -> StoreResult<()> {
        match self {
            Write::Create(r)                    => store.create(r),
            Write::Update { kind, id, fields }  => store.update(&kind, id, fields),
            Write::Delete { kind, id }          => store.delete(&kind, id).map(|_| ()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WriteQueue {
    /// `None` marks a write that was coalesced away.
    pending: Vec<Option<Write>>,
    /// Key → slot of the newest create/update for it.
    latest:  BTreeMap<(String, u64), usize>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes waiting.
    pub fn len(&self) -> usize {
        self.pending.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn create(&mut self, record: Record) {
        self.push(Write::Create(record));
    }

    pub fn update(&mut self, kind: impl Into<String>, id: u64, fields: Fields) {
        self.push(Write::Update { kind: kind.into(), id, fields });
    }

    pub fn delete(&mut self, kind: impl Into<String>, id: u64) {
        self.push(Write::Delete { kind: kind.into(), id });
    }

    pub fn push(&mut self, write: Write) {
        let key = {
            let (k, id) = write.key();
            (k.to_owned(), id)
        };
        let prior = self.latest.get(&key).copied();

        match (write, prior) {
            (Write::Update { fields, .. }, Some(slot)) => match &mut self.pending[slot] {
                Some(Write::Create(r)) => r.merge(fields),
                Some(Write::Update { fields: queued, .. }) => queued.extend(fields),
                _ => {}
            },
            (Write::Delete { kind, id }, Some(slot)) => {
                let was_create = matches!(self.pending[slot], Some(Write::Create(_)));
                self.pending[slot] = None;
                self.latest.remove(&key);
                if !was_create {
                    self.pending.push(Some(Write::Delete { kind, id }));
                }
            }
            (write @ (Write::Create(_) | Write::Update { .. }), _) => {
                self.latest.insert(key, self.pending.len());
                self.pending.push(Some(write));
            }
            (write @ Write::Delete { .. }, None) => self.pending.push(Some(write)),
        }
    }

    /// Apply every queued write to `store` in order, then `sync` it.
    ///
    /// Returns the number of writes applied.  On error the failed write and
    /// everything after it stay queued.
    pub fn flush(&mut self, store: &mut dyn RecordStore) -> StoreResult<usize> {
        let writes: Vec<Write> = std::mem::take(&mut self.pending).into_iter().flatten().collect();
        self.latest.clear();
        let total = writes.len();

        let mut iter = writes.into_iter();
        let mut applied = 0;
        while let Some(write) = iter.next() {
            let retry = write.clone();
            if let Err(e) = write.apply(store) {
                tracing::error!(error = %e, applied, remaining = total - applied, "write queue flush failed");
                self.push(retry);
                for rest in iter {
                    self.push(rest);
                }
                return Err(e);
            }
            applied += 1;
        }
        store.sync()?;
        if applied > 0 {
            tracing::debug!(applied, "write queue flushed");
        }
        Ok(applied)
    }
}
