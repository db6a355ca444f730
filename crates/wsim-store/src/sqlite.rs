//! SQLite backend (feature `sqlite`).
//!
//! One `records` table keyed by `(kind, id)`; the field map is stored as a
//! JSON object.  Queries select by kind in SQL and apply the field filters
//! to the decoded rows.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::{Fields, Query, Record, RecordStore, StoreError, StoreResult};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Self::init(conn)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                 kind   TEXT    NOT NULL,
                 id     INTEGER NOT NULL,
                 fields TEXT    NOT NULL,
                 PRIMARY KEY (kind, id)
             );",
        )?;
        Ok(Self { conn })
    }

    fn of_kind(&self, kind: &str) -> StoreResult<Vec<Record>> {
        let mut stmt = self.conn.prepare_cached("SELECT id, fields FROM records WHERE kind = ?1 ORDER BY id")?;
        let rows = stmt.query_map([kind], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            let (id, json) = row?;
            out.push(Record { kind: kind.to_owned(), id: id as u64, fields: serde_json::from_str(&json)? });
        }
        Ok(out)
    }
}

impl RecordStore for SqliteStore {
    fn create(&mut self, record: Record) -> StoreResult<()> {
        let json = serde_json::to_string(&record.fields)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO records (kind, id, fields) VALUES (?1, ?2, ?3)",
            rusqlite::params![record.kind, record.id as i64, json],
        )?;
        if inserted == 0 {
            return Err(StoreError::Duplicate { kind: record.kind, id: record.id });
        }
        Ok(())
    }

    fn update(&mut self, kind: &str, id: u64, fields: Fields) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let current: Option<String> = tx
            .query_row(
                "SELECT fields FROM records WHERE kind = ?1 AND id = ?2",
                rusqlite::params![kind, id as i64],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Err(StoreError::UnknownRecord { kind: kind.to_owned(), id });
        };
        let mut merged: Fields = serde_json::from_str(&current)?;
        merged.extend(fields);
        tx.execute(
            "UPDATE records SET fields = ?3 WHERE kind = ?1 AND id = ?2",
            rusqlite::params![kind, id as i64, serde_json::to_string(&merged)?],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn find(&self, query: &Query) -> StoreResult<Vec<Record>> {
        Ok(query.apply(&self.of_kind(&query.kind)?))
    }

    fn count(&self, query: &Query) -> StoreResult<usize> {
        if query.filters.is_empty() {
            let n: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM records WHERE kind = ?1",
                [&query.kind],
                |row| row.get(0),
            )?;
            return Ok(n as usize);
        }
        Ok(query.count(&self.of_kind(&query.kind)?))
    }

    fn delete(&mut self, kind: &str, id: u64) -> StoreResult<bool> {
        let n = self.conn.execute(
            "DELETE FROM records WHERE kind = ?1 AND id = ?2",
            rusqlite::params![kind, id as i64],
        )?;
        Ok(n > 0)
    }

    fn get(&self, kind: &str, id: u64) -> StoreResult<Option<Record>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT fields FROM records WHERE kind = ?1 AND id = ?2",
                rusqlite::params![kind, id as i64],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(j) => Ok(Some(Record { kind: kind.to_owned(), id, fields: serde_json::from_str(&j)? })),
            None => Ok(None),
        }
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
