//! Rows and column values
//!
//! Every optional document field goes through the same presence rule: a
//! text field is present only when its column holds text, and a count or
//! flag field only when its column holds an integer. Any other value
//! (`NULL`, or a value of the wrong storage class) means the field is
//! omitted from the document.

use rusqlite::types::ValueRef;
use serde_json::{Number, Value};
use usnvc_core::{RawRecord, UnitId};

/// A single column value, by SQLite storage class
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl FieldValue {
    /// Text content, if this value is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer content, if this value is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// JSON rendering used for raw-data records
    ///
    /// Non-finite reals (NaN, infinities) have no JSON form and become
    /// `null`. Blobs are rendered as lossy UTF-8 text.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Integer(value) => Value::Number((*value).into()),
            FieldValue::Real(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Blob(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

impl From<ValueRef<'_>> for FieldValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(v) => FieldValue::Integer(v),
            ValueRef::Real(v) if v.is_nan() => FieldValue::Null,
            ValueRef::Real(v) => FieldValue::Real(v),
            ValueRef::Text(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => FieldValue::Blob(bytes.to_vec()),
        }
    }
}

/// One result row: column names in select order with their values
///
/// Column lookup ignores ASCII case, and the first column with a matching
/// name wins when a join returns duplicate names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new(columns: Vec<(String, FieldValue)>) -> Self {
        Self { columns }
    }

    /// Value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// Text value of a column, if present under the presence rule
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(FieldValue::as_text)
    }

    /// Owned text value of a column, if present
    pub fn string(&self, column: &str) -> Option<String> {
        self.text(column).map(str::to_string)
    }

    /// Integer value of a column, if present under the presence rule
    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(FieldValue::as_integer)
    }

    /// Unit identifier stored in a column
    ///
    /// Identifier columns occasionally come through as text or as whole
    /// reals; both are accepted when they denote an integer.
    pub fn unit_id(&self, column: &str) -> Option<UnitId> {
        match self.get(column)? {
            FieldValue::Integer(value) => Some(UnitId::new(*value)),
            FieldValue::Real(value) if value.fract() == 0.0 => Some(UnitId::new(*value as i64)),
            FieldValue::Text(text) => text.trim().parse().ok().map(UnitId::new),
            _ => None,
        }
    }

    /// Text rendering of a scalar column (text, integer, or finite real)
    pub fn display(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Integer(value) => Some(value.to_string()),
            FieldValue::Real(value) => Some(value.to_string()),
            FieldValue::Null | FieldValue::Blob(_) => None,
        }
    }

    /// Column names in select order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Convert into a raw-data record, keeping the first of duplicate names
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        for (name, value) in &self.columns {
            if !record.contains_key(name) {
                record.insert(name.clone(), value.to_json());
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(vec![
            ("element_global_id".to_string(), FieldValue::Integer(683123)),
            ("Floristics".to_string(), FieldValue::Text("Grass &amp; forbs".to_string())),
            ("plotCount".to_string(), FieldValue::Integer(14)),
            ("plotSummary".to_string(), FieldValue::Null),
            ("tncEcoregions".to_string(), FieldValue::Real(3.0)),
            ("ELEMENT_GLOBAL_ID".to_string(), FieldValue::Integer(1)),
        ])
    }

    #[test]
    fn test_presence_rule() {
        let row = sample();
        assert_eq!(row.text("Floristics"), Some("Grass &amp; forbs"));
        assert_eq!(row.integer("plotCount"), Some(14));
        assert_eq!(row.text("plotSummary"), None);
        // wrong storage class counts as absent
        assert_eq!(row.integer("tncEcoregions"), None);
        assert_eq!(row.text("plotCount"), None);
        assert_eq!(row.text("no_such_column"), None);
    }

    #[test]
    fn test_lookup_ignores_case_and_prefers_first() {
        let row = sample();
        assert_eq!(row.integer("ELEMENT_GLOBAL_ID"), Some(683123));
        assert_eq!(row.integer("floristics"), None);
        assert_eq!(row.text("FLORISTICS"), Some("Grass &amp; forbs"));
    }

    #[test]
    fn test_unit_id_accepts_integral_forms() {
        let row = Row::new(vec![
            ("a".to_string(), FieldValue::Integer(5)),
            ("b".to_string(), FieldValue::Real(6.0)),
            ("c".to_string(), FieldValue::Text(" 7 ".to_string())),
            ("d".to_string(), FieldValue::Real(6.5)),
            ("e".to_string(), FieldValue::Null),
        ]);
        assert_eq!(row.unit_id("a"), Some(UnitId::new(5)));
        assert_eq!(row.unit_id("b"), Some(UnitId::new(6)));
        assert_eq!(row.unit_id("c"), Some(UnitId::new(7)));
        assert_eq!(row.unit_id("d"), None);
        assert_eq!(row.unit_id("e"), None);
    }

    #[test]
    fn test_nan_becomes_null() {
        assert_eq!(FieldValue::from(ValueRef::Real(f64::NAN)), FieldValue::Null);
        assert_eq!(FieldValue::Real(f64::INFINITY).to_json(), Value::Null);
    }

    #[test]
    fn test_record_keeps_first_duplicate() {
        let record = sample().to_record();
        assert_eq!(record["element_global_id"], 683123);
        assert_eq!(record["ELEMENT_GLOBAL_ID"], 1);
        assert!(record["plotSummary"].is_null());
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_display_renders_scalars() {
        let row = sample();
        assert_eq!(row.display("plotCount").as_deref(), Some("14"));
        assert_eq!(row.display("plotSummary"), None);
    }
}
