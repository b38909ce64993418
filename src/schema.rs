//! Schema inference for report records
//!
//! Reports carry no schema contract, so the roles a chart needs (what names a
//! bar, what gets measured, what groups rows) are inferred once per collection
//! from its first record. Everything downstream works off the resulting
//! [`Schema`] instead of guessing field names on every access.

use crate::error::{Error, Result};
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Role assignment for one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Field naming a chart bar / the row's primary identifier
    pub label_field: String,
    /// Field being measured
    pub value_field: String,
    /// Optional grouping field (only when hinted by report metadata)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_field: Option<String>,
}

impl Schema {
    /// One-field collections label and measure the same field
    pub fn is_degenerate(&self) -> bool {
        self.label_field == self.value_field
    }
}

/// Infer the schema from a sample record.
///
/// - value: last numeric field, else the last field
/// - label: first field that is neither the hint nor the value field; else the
///   first non-value field; else the first field
/// - category: the hint, when present and not already playing another role
///
/// When the hint is the only non-value field it becomes the label and no
/// category is kept. Falling back to the first field instead could make the
/// label coincide with the value or the category; keeping roles distinct wins.
///
/// A sample without fields has nothing to display and is reported as
/// [`Error::EmptyCollection`].
pub fn infer(sample: &Record, category_hint: Option<&str>) -> Result<Schema> {
    let fields: Vec<&str> = sample.field_names().collect();
    let (Some(&first), Some(&last)) = (fields.first(), fields.last()) else {
        return Err(Error::EmptyCollection);
    };

    let value_field = fields
        .iter()
        .rev()
        .copied()
        .find(|field| sample.get(field).is_number())
        .unwrap_or(last);

    let hint = category_hint.filter(|hint| fields.contains(hint));

    let label_field = fields
        .iter()
        .copied()
        .find(|field| Some(*field) != hint && *field != value_field)
        .or_else(|| fields.iter().copied().find(|field| *field != value_field))
        .unwrap_or(first);

    let category_field = hint
        .filter(|hint| *hint != label_field && *hint != value_field)
        .map(str::to_string);

    Ok(Schema {
        label_field: label_field.to_string(),
        value_field: value_field.to_string(),
        category_field,
    })
}

/// Infer from the first record of a collection
pub fn infer_collection(records: &[Record], category_hint: Option<&str>) -> Result<Schema> {
    let sample = records.first().ok_or(Error::EmptyCollection)?;
    infer(sample, category_hint)
}
