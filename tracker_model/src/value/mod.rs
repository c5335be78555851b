//! Field values - the algebraic shape of every tracker field.
//!
//! Tracker payloads are loosely typed JSON. Each field is classified once, when
//! it is converted from JSON, into a closed set of variants. Compound records
//! carry a [`RecordShape`] discriminant so rendering never has to probe keys
//! again.

mod label;
mod resolve;

pub use label::*;
pub use resolve::*;

use serde_json::{Map, Value};

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    /// Numeric view of the scalar, parsing text when it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Render a number the way it was most likely written: integral values
/// without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Known compound record shapes, checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    /// Has `mood`; other sub-fields are conditions.
    Status,
    /// Has `name`, optionally a `quantity`.
    NamedEntity,
    /// Has `title`.
    Titled,
    /// Has both `start` and `end`.
    TimeRange,
    /// Has both `emoji` and `forecast`.
    Weather,
    /// Any other record with one to three keys.
    Generic,
    /// Nothing recognizable; resolves to empty.
    Unknown,
}

impl RecordShape {
    /// Classify a record by its keys.
    pub fn classify(fields: &[(String, FieldValue)]) -> Self {
        let has = |key: &str| fields.iter().any(|(k, _)| k == key);

        if has("mood") {
            RecordShape::Status
        } else if has("name") {
            RecordShape::NamedEntity
        } else if has("title") {
            RecordShape::Titled
        } else if has("start") && has("end") {
            RecordShape::TimeRange
        } else if has("emoji") && has("forecast") {
            RecordShape::Weather
        } else if (1..=3).contains(&fields.len()) {
            RecordShape::Generic
        } else {
            RecordShape::Unknown
        }
    }
}

/// A compound record with its shape fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    shape: RecordShape,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Build a record, classifying its shape from the keys present.
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            shape: RecordShape::classify(&fields),
            fields,
        }
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Look up a sub-field by key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Any tracker field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Null or absent.
    #[default]
    Empty,
    Scalar(Scalar),
    List(Vec<FieldValue>),
    /// A value frozen against automated change. The flag never affects display.
    Locked { value: Box<FieldValue>, locked: bool },
    Record(Record),
}

impl FieldValue {
    /// Create a text scalar.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::Text(s.into()))
    }

    /// Create a numeric scalar.
    pub fn number(n: f64) -> Self {
        FieldValue::Scalar(Scalar::Number(n))
    }

    /// Wrap a value in a lock wrapper.
    pub fn locked(value: FieldValue, locked: bool) -> Self {
        FieldValue::Locked {
            value: Box::new(value),
            locked,
        }
    }

    /// Convert a JSON value into a classified field value.
    ///
    /// Any non-array object holding a `value` key is a lock wrapper, whatever
    /// else it contains.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Empty,
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(|n| FieldValue::Scalar(Scalar::Number(n)))
                .unwrap_or_else(|| FieldValue::text(n.to_string())),
            Value::String(s) => FieldValue::text(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from_json).collect()),
            Value::Object(map) => match map.get("value") {
                Some(inner) => FieldValue::locked(
                    FieldValue::from_json(inner),
                    map.get("locked").and_then(Value::as_bool).unwrap_or(false),
                ),
                None => FieldValue::Record(Record::new(record_fields(map))),
            },
        }
    }

    /// Strip any number of lock wrappers.
    pub fn unlocked(&self) -> &FieldValue {
        let mut current = self;
        while let FieldValue::Locked { value, .. } = current {
            current = value;
        }
        current
    }

    /// Whether the outermost wrapper marks this field as locked.
    pub fn is_locked(&self) -> bool {
        matches!(self, FieldValue::Locked { locked: true, .. })
    }

    /// Sub-field lookup through lock wrappers.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self.unlocked() {
            FieldValue::Record(record) => record.get(key),
            _ => None,
        }
    }

    /// The record beneath any lock wrappers.
    pub fn as_record(&self) -> Option<&Record> {
        match self.unlocked() {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The list beneath any lock wrappers.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self.unlocked() {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view of a scalar beneath any lock wrappers.
    pub fn as_number(&self) -> Option<f64> {
        match self.unlocked() {
            FieldValue::Scalar(s) => s.as_number(),
            _ => None,
        }
    }

    /// True when the field resolves to no display text.
    pub fn is_blank(&self) -> bool {
        self.resolve().is_empty()
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        FieldValue::from_json(value)
    }
}

fn record_fields(map: &Map<String, Value>) -> Vec<(String, FieldValue)> {
    map.iter()
        .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lock_wrapper_detection() {
        let field = FieldValue::from_json(&json!({"value": "Sword", "locked": true}));
        assert!(field.is_locked());
        assert_eq!(field.unlocked(), &FieldValue::text("Sword"));

        // Lock flag is optional
        let field = FieldValue::from_json(&json!({"value": 3}));
        assert!(!field.is_locked());
        assert!(matches!(field, FieldValue::Locked { .. }));
    }

    #[test]
    fn test_record_shape_priority() {
        let shape = |v: Value| match FieldValue::from_json(&v) {
            FieldValue::Record(r) => r.shape(),
            other => panic!("expected record, got {:?}", other),
        };

        assert_eq!(shape(json!({"mood": "calm", "name": "x"})), RecordShape::Status);
        assert_eq!(shape(json!({"name": "Rope", "title": "x"})), RecordShape::NamedEntity);
        assert_eq!(shape(json!({"title": "Find the relic"})), RecordShape::Titled);
        assert_eq!(shape(json!({"start": "9:00", "end": "10:00"})), RecordShape::TimeRange);
        assert_eq!(shape(json!({"emoji": "🌧️", "forecast": "Rain"})), RecordShape::Weather);
        assert_eq!(shape(json!({"a": 1, "b": 2})), RecordShape::Generic);
        assert_eq!(shape(json!({"a": 1, "b": 2, "c": 3, "d": 4})), RecordShape::Unknown);
        assert_eq!(shape(json!({})), RecordShape::Unknown);
    }

    #[test]
    fn test_nested_lock_unwrapping() {
        let field = FieldValue::from_json(&json!({"value": {"value": {"status": "Wary"}}}));
        assert_eq!(field.get("status"), Some(&FieldValue::text("Wary")));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::from_json(&json!(7)).as_number(), Some(7.0));
        assert_eq!(FieldValue::from_json(&json!(" 42 ")).as_number(), Some(42.0));
        assert_eq!(FieldValue::from_json(&json!({"value": 5, "locked": true})).as_number(), Some(5.0));
        assert_eq!(FieldValue::from_json(&json!("many")).as_number(), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(7.5), "7.5");
    }
}
