//! `Record`: one typed row in a store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name → JSON value.
pub type Fields = BTreeMap<String, Value>;

/// A stored object, identified by `(kind, id)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind:   String,
    pub id:     u64,
    pub fields: Fields,
}

impl Record {
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self { kind: kind.into(), id, fields: Fields::new() }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Overwrite the given fields, leaving the rest untouched.
    pub fn merge(&mut self, fields: Fields) {
        self.fields.extend(fields);
    }

    pub fn key(&self) -> (&str, u64) {
        (&self.kind, self.id)
    }
}
