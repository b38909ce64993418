//! Chart series and the controls rendered next to it
//!
//! The series is the resolved selection mapped to `(label, value)` pairs in
//! collection order. Backends send "Top N" rankings, so nothing here re-sorts.

use crate::collection::categories;
use crate::record::Record;
use crate::schema::Schema;
use crate::selection::{CategoryFilter, Selection};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Non-fatal problems found while building a series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The value field held something without a numeric reading; plotted as 0
    NonNumericValue {
        label: String,
        field: String,
        raw: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonNumericValue { label, field, raw } => write!(
                f,
                "{}: {} = {:?} is not numeric, plotted as 0",
                label, field, raw
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Series {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn max(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }
}

/// Category dropdown entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub value: CategoryFilter,
    pub selected: bool,
}

/// Checkbox entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemToggle {
    pub label: String,
    pub checked: bool,
}

/// Everything a chart card renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub series: Series,
    /// Empty when the collection has no category field
    pub categories: Vec<CategoryOption>,
    pub items: Vec<ItemToggle>,
}

fn point_for(record: &Record, schema: &Schema, diagnostics: &mut Vec<Diagnostic>) -> SeriesPoint {
    let label = record.text(&schema.label_field);
    let raw = record.get(&schema.value_field);
    let value = match raw.coerce_number() {
        Some(value) => value,
        None => {
            tracing::warn!(
                label = %label,
                field = %schema.value_field,
                raw = %raw,
                "non-numeric chart value coerced to 0"
            );
            diagnostics.push(Diagnostic::NonNumericValue {
                label: label.clone(),
                field: schema.value_field.clone(),
                raw: raw.to_string(),
            });
            0.0
        }
    };
    SeriesPoint { label, value }
}

pub fn build_series(records: &[Record], schema: &Schema, selection: &Selection) -> Series {
    let mut diagnostics = Vec::new();
    let points = selection
        .resolve(records, schema)
        .into_iter()
        .map(|record| point_for(record, schema, &mut diagnostics))
        .collect();
    Series {
        points,
        diagnostics,
    }
}

/// Series plus dropdown and checkbox state, all derived from the same selection
pub fn bind(records: &[Record], schema: &Schema, selection: &Selection) -> ChartView {
    let series = build_series(records, schema, selection);

    let found = categories(records, schema);
    let categories = if found.is_empty() {
        Vec::new()
    } else {
        std::iter::once(CategoryFilter::All)
            .chain(found.into_iter().map(CategoryFilter::Only))
            .map(|value| CategoryOption {
                selected: value == selection.category,
                value,
            })
            .collect()
    };

    let items = selection
        .candidate_labels(records, schema)
        .into_iter()
        .map(|label| ItemToggle {
            checked: selection.is_checked(&label),
            label,
        })
        .collect();

    ChartView {
        series,
        categories,
        items,
    }
}
