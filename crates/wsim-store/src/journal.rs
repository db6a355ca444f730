//! CSV change-log backend.
//!
//! Every successful mutation is appended to a single CSV file as one row:
//!
//! | Column   | Content                                         |
//! |----------|-------------------------------------------------|
//! | `op`     | `create`, `update`, or `delete`                 |
//! | `kind`   | record kind                                     |
//! | `id`     | record id                                       |
//! | `fields` | JSON object of the written fields (empty on delete) |
//!
//! Opening an existing journal replays it into memory, so queries are
//! answered from the in-memory image.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer, WriterBuilder};
use serde::Deserialize;

use crate::{Fields, MemoryStore, Query, Record, RecordStore, StoreError, StoreResult};

const HEADER: [&str; 4] = ["op", "kind", "id", "fields"];

#[derive(Deserialize)]
struct JournalRow {
    op:     String,
    kind:   String,
    id:     u64,
    fields: String,
}

pub struct JournalStore {
    image:  MemoryStore,
    writer: Writer<File>,
    path:   PathBuf,
}

impl JournalStore {
    /// Open (or create) the journal at `path`, replaying any existing rows.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let mut image = MemoryStore::new();
        let existed = path.exists() && std::fs::metadata(path)?.len() > 0;
        if existed {
            replay(path, &mut image)?;
            tracing::info!(path = %path.display(), records = image.len(), "journal replayed");
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !existed {
            writer.write_record(HEADER)?;
        }
        Ok(Self { image, writer, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The replayed and updated in-memory image.
    pub fn image(&self) -> &MemoryStore {
        &self.image
    }

    fn append(&mut self, op: &str, kind: &str, id: u64, fields: Option<&Fields>) -> StoreResult<()> {
        let encoded = match fields {
            Some(f) => serde_json::to_string(f)?,
            None => String::new(),
        };
        self.writer.write_record([op, kind, &id.to_string(), &encoded])?;
        Ok(())
    }
}

fn replay(path: &Path, image: &mut MemoryStore) -> StoreResult<()> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    for (i, row) in rdr.deserialize::<JournalRow>().enumerate() {
        // Line 1 is the header.
        let line = i as u64 + 2;
        let row = row?;
        let fields = || -> StoreResult<Fields> { Ok(serde_json::from_str(&row.fields)?) };
        match row.op.as_str() {
            "create" => image.create(Record { kind: row.kind.clone(), id: row.id, fields: fields()? })?,
            "update" => image.update(&row.kind, row.id, fields()?)?,
            "delete" => {
                image.delete(&row.kind, row.id)?;
            }
            other => {
                return Err(StoreError::Journal { line, reason: format!("unknown op {other:?}") });
            }
        }
    }
    Ok(())
}

impl RecordStore for JournalStore {
    fn create(&mut self, record: Record) -> StoreResult<()> {
        let (kind, id, fields) = (record.kind.clone(), record.id, record.fields.clone());
        self.image.create(record)?;
        self.append("create", &kind, id, Some(&fields))
    }

    fn update(&mut self, kind: &str, id: u64, fields: Fields) -> StoreResult<()> {
        self.image.update(kind, id, fields.clone())?;
        self.append("update", kind, id, Some(&fields))
    }

    fn find(&self, query: &Query) -> StoreResult<Vec<Record>> {
        self.image.find(query)
    }

    fn count(&self, query: &Query) -> StoreResult<usize> {
        self.image.count(query)
    }

    fn delete(&mut self, kind: &str, id: u64) -> StoreResult<bool> {
        if !self.image.delete(kind, id)? {
            return Ok(false);
        }
        self.append("delete", kind, id, None)?;
        Ok(true)
    }

    fn get(&self, kind: &str, id: u64) -> StoreResult<Option<Record>> {
        self.image.get(kind, id)
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }
}
