//! Records with runtime-defined fields
//!
//! Reports arrive as JSON arrays of flat objects whose field names are not known
//! ahead of time. A [`Record`] keeps the fields in the order the backend sent
//! them, and every value is collapsed into a [`Value`] scalar.

use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

static MISSING: Value = Value::Missing;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Absent key or JSON `null`
    Missing,
}

impl Value {
    /// Strict numeric check: only real numbers count
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Lenient conversion used when plotting: numbers pass through, text is
    /// parsed after trimming. Anything else has no numeric reading.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Convert a JSON value into a scalar.
    ///
    /// Booleans become text, nested arrays/objects become their compact JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            nested => {
                tracing::debug!(value = %nested, "flattening nested JSON value to text");
                Value::Text(nested.to_string())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Missing => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

/// One row of a report: ordered `(field, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Re-inserting a field replaces its value in place.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Value of `field`, or `Missing` when the record has no such field
    pub fn get(&self, field: &str) -> &Value {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
            .unwrap_or(&MISSING)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    pub fn field_names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display form of `field` (empty string when missing)
    pub fn text(&self, field: &str) -> String {
        self.get(field).to_string()
    }

    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(name, value)| (name, Value::from_json(value)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Record::from_json_map(map))
    }
}

/// Parse a JSON array of flat objects
pub fn records_from_json(json: &str) -> Result<Vec<Record>> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = parsed else {
        return Err(Error::NotARecordArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(map) => Ok(Record::from_json_map(map)),
            _ => Err(Error::NotAnObject { index }),
        })
        .collect()
}

/// Read and parse a report file
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    records_from_json(&contents)
}

/// Case-folding string ordering: case-insensitive first, lowercase before
/// uppercase when the strings differ only by case. Not locale collation:
/// characters compare by code point after lowercasing, so `é` sorts after `z`.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
