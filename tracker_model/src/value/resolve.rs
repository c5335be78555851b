//! Field value resolution - canonical display text for any field.

use super::{format_number, FieldValue, Record, RecordShape};

/// Resolve a field to its display string.
///
/// Total and pure: every shape bottoms out at a scalar or the empty string.
pub fn resolve(field: &FieldValue) -> String {
    field.resolve()
}

impl FieldValue {
    /// Resolve this field to its display string.
    ///
    /// # Rules
    ///
    /// 1. Empty resolves to `""`
    /// 2. Lock wrappers resolve to their inner value; the flag is ignored
    /// 3. Scalars are stringified
    /// 4. Lists resolve each element, drop empties, and join with `", "`
    /// 5. Records render according to their shape
    pub fn resolve(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Locked { value, .. } => value.resolve(),
            FieldValue::Scalar(scalar) => scalar.to_string(),
            FieldValue::List(items) => join_resolved(items.iter(), ", "),
            FieldValue::Record(record) => record.resolve(),
        }
    }
}

impl Record {
    /// Render the record according to its shape.
    pub fn resolve(&self) -> String {
        let field = |key: &str| self.get(key).map(FieldValue::resolve).unwrap_or_default();

        match self.shape() {
            RecordShape::Status => {
                let mut parts = vec![field("mood")];
                parts.extend(
                    self.fields()
                        .iter()
                        .filter(|(k, _)| k != "mood")
                        .map(|(_, v)| v.resolve()),
                );
                join_non_empty(parts, " - ")
            }
            RecordShape::NamedEntity => {
                let name = field("name");
                if name.is_empty() {
                    return name;
                }
                match self.get("quantity").and_then(FieldValue::as_number) {
                    Some(qty) if qty > 1.0 => format!("{} (x{})", name, format_number(qty)),
                    _ => name,
                }
            }
            RecordShape::Titled => field("title"),
            RecordShape::TimeRange => join_non_empty(vec![field("start"), field("end")], " - "),
            RecordShape::Weather => join_non_empty(vec![field("emoji"), field("forecast")], " "),
            RecordShape::Generic => join_non_empty(
                self.fields()
                    .iter()
                    .map(|(k, v)| (k, v.resolve()))
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect(),
                ", ",
            ),
            RecordShape::Unknown => String::new(),
        }
    }
}

fn join_resolved<'a>(items: impl Iterator<Item = &'a FieldValue>, sep: &str) -> String {
    join_non_empty(items.map(FieldValue::resolve).collect(), sep)
}

fn join_non_empty(parts: Vec<String>, sep: &str) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
