//! Field-scoped queries over records of one kind.
//!
//! Comparisons are defined between numbers (as `f64`), between strings, and
//! between booleans.  A filter comparing values of different types, or
//! naming a field the record lacks, does not match.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Record;

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
    /// Inclusive on both ends; an absent bound is open.
    Range { field: String, min: Option<Value>, max: Option<Value> },
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Eq(field, v) => {
                record.get(field).is_some_and(|x| compare(x, v) == Some(Ordering::Equal))
            }
            Filter::In(field, vs) => record
                .get(field)
                .is_some_and(|x| vs.iter().any(|v| compare(x, v) == Some(Ordering::Equal))),
            Filter::Range { field, min, max } => {
                let Some(x) = record.get(field) else { return false };
                let above = min.as_ref().is_none_or(|m| matches!(compare(x, m), Some(Ordering::Greater | Ordering::Equal)));
                let below = max.as_ref().is_none_or(|m| matches!(compare(x, m), Some(Ordering::Less | Ordering::Equal)));
                above && below
            }
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Records of `kind` matching every filter, optionally sorted and paged.
///
/// Without a sort key results come back in id order.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub kind:    String,
    pub filters: Vec<Filter>,
    pub sort:    Option<(String, SortOrder)>,
    pub offset:  usize,
    pub limit:   Option<usize>,
}

impl Query {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), filters: Vec::new(), sort: None, offset: 0, limit: None }
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.into(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.filters.push(Filter::In(field.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Open-ended range: pass `None` for an unbounded side.
    pub fn range(mut self, field: impl Into<String>, min: Option<Value>, max: Option<Value>) -> Self {
        self.filters.push(Filter::Range { field: field.into(), min, max });
        self
    }

    pub fn between(self, field: impl Into<String>, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.range(field, Some(min.into()), Some(max.into()))
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.kind == self.kind && self.filters.iter().all(|f| f.matches(record))
    }

    /// Filter, sort, and page `records`.
    pub fn apply<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> Vec<Record> {
        let mut hits: Vec<&Record> = records.into_iter().filter(|r| self.matches(r)).collect();
        hits.sort_by_key(|r| r.id);
        if let Some((field, order)) = &self.sort {
            // Records missing the field sort last either way.
            hits.sort_by(|a, b| {
                let ord = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                    (Some(_), None)    => return Ordering::Less,
                    (None, Some(_))    => return Ordering::Greater,
                    (None, None)       => Ordering::Equal,
                };
                match order {
                    SortOrder::Ascending  => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        hits.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Number of matching records, ignoring offset and limit.
    pub fn count<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> usize {
        records.into_iter().filter(|r| self.matches(r)).count()
    }
}

/// Order two JSON scalars of the same type.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y))     => Some(x.cmp(y)),
        (Value::Null, Value::Null)           => Some(Ordering::Equal),
        _ => None,
    }
}
