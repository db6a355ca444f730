//! Unit tests for wsim-store.

#[cfg(test)]
mod helpers {
    use crate::{Record, RecordStore};

    pub fn action(id: u64, state: &str, actor: u64, priority: f64) -> Record {
        Record::new("action", id)
            .with("state", state)
            .with("actor", actor)
            .with("priority", priority)
    }

    pub fn seed(store: &mut dyn RecordStore) {
        store.create(action(1, "pending", 1, 0.7)).unwrap();
        store.create(action(2, "in_progress", 2, 0.5)).unwrap();
        store.create(action(3, "complete", 3, 0.2)).unwrap();
        store.create(action(4, "pending", 3, 0.35)).unwrap();
        store.create(Record::new("interaction", 1).with("kind", "combat")).unwrap();
    }

    pub fn ids(records: &[Record]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod query_tests {
    use serde_json::json;

    use super::helpers::{ids, seed};
    use crate::{MemoryStore, Query, Record, RecordStore, SortOrder};

    fn store() -> MemoryStore {
        let mut s = MemoryStore::new();
        seed(&mut s);
        s
    }

    #[test]
    fn equality_and_membership() {
        let s = store();
        let pending = s.find(&Query::new("action").eq("state", "pending")).unwrap();
        assert_eq!(ids(&pending), [1, 4]);

        let q = Query::new("action").is_in("actor", [1u64, 3]);
        assert_eq!(s.count(&q).unwrap(), 3);
        assert_eq!(s.count(&Query::new("interaction")).unwrap(), 1);
        assert_eq!(s.count(&Query::new("agent")).unwrap(), 0);
    }

    #[test]
    fn ranges_compare_numbers_across_representations() {
        let s = store();
        let q = Query::new("action").between("priority", 0.3, 0.6);
        assert_eq!(ids(&s.find(&q).unwrap()), [2, 4]);

        let q = Query::new("action").range("actor", Some(json!(2)), None);
        assert_eq!(ids(&s.find(&q).unwrap()), [2, 3, 4]);
    }

    #[test]
    fn mismatched_types_never_match() {
        let s = store();
        assert_eq!(s.count(&Query::new("action").eq("actor", "1")).unwrap(), 0);
        assert_eq!(s.count(&Query::new("action").eq("missing", 1)).unwrap(), 0);
    }

    #[test]
    fn sort_and_page() {
        let s = store();
        let q = Query::new("action").sort_by("priority", SortOrder::Descending);
        assert_eq!(ids(&s.find(&q).unwrap()), [1, 2, 4, 3]);

        let page = q.clone().offset(1).limit(2);
        assert_eq!(ids(&s.find(&page).unwrap()), [2, 4]);
        // Paging does not change the count.
        assert_eq!(s.count(&page).unwrap(), 4);
    }

    #[test]
    fn records_missing_the_sort_key_come_last() {
        let mut s = store();
        s.create(Record::new("action", 9).with("state", "pending")).unwrap();
        let q = Query::new("action").sort_by("priority", SortOrder::Ascending);
        assert_eq!(ids(&s.find(&q).unwrap()), [3, 4, 2, 1, 9]);
    }
}

// ── Memory store ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod memory_tests {
    use serde_json::json;

    use super::helpers::{action, seed};
    use crate::{Fields, MemoryStore, RecordStore, StoreError};

    #[test]
    fn partial_update_keeps_other_fields() {
        let mut s = MemoryStore::new();
        seed(&mut s);
        let fields: Fields = [("state".to_owned(), json!("complete"))].into();
        s.update("action", 1, fields).unwrap();

        let r = s.get("action", 1).unwrap().unwrap();
        assert_eq!(r.get("state"), Some(&json!("complete")));
        assert_eq!(r.get("priority"), Some(&json!(0.7)));
    }

    #[test]
    fn duplicate_and_unknown_keys_are_errors() {
        let mut s = MemoryStore::new();
        s.create(action(1, "pending", 1, 0.5)).unwrap();
        assert!(matches!(
            s.create(action(1, "pending", 1, 0.5)),
            Err(StoreError::Duplicate { id: 1, .. })
        ));
        assert!(matches!(
            s.update("action", 2, Fields::new()),
            Err(StoreError::UnknownRecord { id: 2, .. })
        ));
    }

    #[test]
    fn delete_reports_presence() {
        let mut s = MemoryStore::new();
        s.create(action(1, "pending", 1, 0.5)).unwrap();
        assert!(s.delete("action", 1).unwrap());
        assert!(!s.delete("action", 1).unwrap());
        assert!(s.is_empty());
    }
}

// ── Write queue ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue_tests {
    use serde_json::json;

    use super::helpers::action;
    use crate::{Fields, MemoryStore, RecordStore, StoreError, Write, WriteQueue};

    fn state(s: &str) -> Fields {
        [("state".to_owned(), json!(s))].into()
    }

    #[test]
    fn updates_fold_into_a_queued_create() {
        let mut q = WriteQueue::new();
        q.create(action(1, "pending", 1, 0.5));
        q.update("action", 1, state("in_progress"));
        q.update("action", 1, state("complete"));
        assert_eq!(q.len(), 1);

        let mut s = MemoryStore::new();
        assert_eq!(q.flush(&mut s).unwrap(), 1);
        assert!(q.is_empty());
        assert_eq!(s.get("action", 1).unwrap().unwrap().get("state"), Some(&json!("complete")));
    }

    #[test]
    fn create_then_delete_cancels_out() {
        let mut q = WriteQueue::new();
        q.create(action(1, "pending", 1, 0.5));
        q.delete("action", 1);
        assert!(q.is_empty());
    }

    #[test]
    fn update_then_delete_keeps_the_delete() {
        let mut s = MemoryStore::new();
        s.create(action(1, "pending", 1, 0.5)).unwrap();

        let mut q = WriteQueue::new();
        q.update("action", 1, state("complete"));
        q.delete("action", 1);
        assert_eq!(q.len(), 1);
        q.flush(&mut s).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn failed_write_stays_queued() {
        let mut s = MemoryStore::new();
        let mut q = WriteQueue::new();
        q.create(action(1, "pending", 1, 0.5));
        q.update("action", 2, state("complete"));
        q.create(action(3, "pending", 3, 0.5));

        assert!(matches!(q.flush(&mut s), Err(StoreError::UnknownRecord { id: 2, .. })));
        assert_eq!(s.len(), 1);
        assert_eq!(q.len(), 2);

        s.create(action(2, "pending", 2, 0.5)).unwrap();
        assert_eq!(q.flush(&mut s).unwrap(), 2);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn write_keys() {
        let w = Write::Delete { kind: "action".into(), id: 4 };
        assert_eq!(w.key(), ("action", 4));
    }
}

// ── Journal ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod journal_tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::helpers::{action, seed};
    use crate::{Fields, JournalStore, Query, RecordStore, StoreError};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn journal_replays_on_open() {
        let dir = tmp();
        let path = dir.path().join("journal.csv");
        {
            let mut j = JournalStore::open(&path).unwrap();
            seed(&mut j);
            let fields: Fields = [("state".to_owned(), json!("complete"))].into();
            j.update("action", 1, fields).unwrap();
            assert!(j.delete("action", 2).unwrap());
            j.sync().unwrap();
        }

        let j = JournalStore::open(&path).unwrap();
        assert_eq!(j.image().len(), 4);
        assert_eq!(j.get("action", 1).unwrap().unwrap().get("state"), Some(&json!("complete")));
        assert!(j.get("action", 2).unwrap().is_none());
        assert_eq!(j.count(&Query::new("action").eq("state", "pending")).unwrap(), 1);
    }

    #[test]
    fn journal_has_one_header_across_reopens() {
        let dir = tmp();
        let path = dir.path().join("journal.csv");
        for id in 1..=2 {
            let mut j = JournalStore::open(&path).unwrap();
            j.create(action(id, "pending", id, 0.5)).unwrap();
            j.sync().unwrap();
        }

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["op", "kind", "id", "fields"]);
        let ops: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_owned()).collect();
        assert_eq!(ops, ["create", "create"]);
    }

    #[test]
    fn failed_mutations_are_not_journaled() {
        let dir = tmp();
        let path = dir.path().join("journal.csv");
        let mut j = JournalStore::open(&path).unwrap();
        j.create(action(1, "pending", 1, 0.5)).unwrap();
        assert!(j.create(action(1, "pending", 1, 0.5)).is_err());
        assert!(!j.delete("action", 7).unwrap());
        j.sync().unwrap();

        let rows = csv::Reader::from_path(&path).unwrap().records().count();
        assert_eq!(rows, 1);
    }

    #[test]
    fn unknown_op_names_its_line() {
        let dir = tmp();
        let path = dir.path().join("journal.csv");
        std::fs::write(&path, "op,kind,id,fields\nexplode,action,1,\n").unwrap();
        assert!(matches!(JournalStore::open(&path), Err(StoreError::Journal { line: 2, .. })));
    }
}

// ── SQLite ────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::helpers::{action, ids, seed};
    use crate::{Fields, Query, RecordStore, SortOrder, SqliteStore, StoreError, WriteQueue};

    #[test]
    fn sqlite_queries_match_memory_semantics() {
        let mut s = SqliteStore::in_memory().unwrap();
        seed(&mut s);
        assert_eq!(s.count(&Query::new("action")).unwrap(), 4);
        let q = Query::new("action").eq("state", "pending").sort_by("priority", SortOrder::Descending);
        assert_eq!(ids(&s.find(&q).unwrap()), [1, 4]);
        assert!(matches!(s.create(action(1, "x", 1, 0.1)), Err(StoreError::Duplicate { .. })));
    }

    #[test]
    fn sqlite_partial_update_and_delete() {
        let mut s = SqliteStore::in_memory().unwrap();
        seed(&mut s);
        let fields: Fields = [("state".to_owned(), json!("complete"))].into();
        s.update("action", 4, fields.clone()).unwrap();
        let r = s.get("action", 4).unwrap().unwrap();
        assert_eq!(r.get("state"), Some(&json!("complete")));
        assert_eq!(r.get("actor"), Some(&json!(3)));

        assert!(matches!(s.update("action", 40, fields), Err(StoreError::UnknownRecord { .. })));
        assert!(s.delete("action", 4).unwrap());
        assert!(s.get("action", 4).unwrap().is_none());
    }

    #[test]
    fn sqlite_file_survives_reopen() {
        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("world.db");
        {
            let mut s = SqliteStore::open(&path).unwrap();
            let mut q = WriteQueue::new();
            q.create(action(1, "pending", 1, 0.5));
            q.flush(&mut s).unwrap();
        }
        let s = SqliteStore::open(&path).unwrap();
        assert_eq!(s.count(&Query::new("action")).unwrap(), 1);
    }
}
