//! A record snapshot paired with its inferred schema
//!
//! Each collection handed over by the API client replaces the previous one
//! wholesale; there is no incremental merge.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{self, Schema};
use crate::selection::CategoryFilter;

#[derive(Debug, Clone, Default)]
pub struct Collection {
    records: Vec<Record>,
    schema: Option<Schema>,
}

impl Collection {
    /// Snapshot `records`, inferring the schema from the first one
    pub fn new(records: Vec<Record>, category_hint: Option<&str>) -> Self {
        let schema = schema::infer_collection(&records, category_hint).ok();
        Self { records, schema }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inferred schema, or `EmptyCollection` when there is nothing to display
    pub fn schema(&self) -> Result<&Schema> {
        self.schema.as_ref().ok_or(Error::EmptyCollection)
    }

    /// Column headers in field order of the first record
    pub fn columns(&self) -> Vec<String> {
        self.records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> Vec<String> {
        match &self.schema {
            Some(schema) => categories(&self.records, schema),
            None => Vec::new(),
        }
    }

    pub fn labels(&self, category: &CategoryFilter) -> Vec<String> {
        match &self.schema {
            Some(schema) => labels(&self.records, schema, category),
            None => Vec::new(),
        }
    }
}

/// Does `record` fall into `category`? Without a category field every record does.
pub fn in_category(record: &Record, schema: &Schema, category: &CategoryFilter) -> bool {
    match (category, &schema.category_field) {
        (CategoryFilter::Only(wanted), Some(field)) => record.text(field) == *wanted,
        _ => true,
    }
}

/// Distinct non-empty category values in first-seen order
pub fn categories(records: &[Record], schema: &Schema) -> Vec<String> {
    let Some(field) = &schema.category_field else {
        return Vec::new();
    };
    let mut seen = Vec::new();
    for record in records {
        let value = record.text(field);
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Distinct labels of the category-filtered records, in first-seen order
pub fn labels(records: &[Record], schema: &Schema, category: &CategoryFilter) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records.iter().filter(|r| in_category(r, schema, category)) {
        let label = record.text(&schema.label_field);
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}
