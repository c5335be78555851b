//! Tracker snapshots - raw per-category payloads and their parsed forms.
//!
//! A snapshot arrives from the host application as loosely typed data: a
//! legacy plain-text block, an older structured object, or the current JSON
//! schema with lock wrappers. Parsing fixes the schema generation once, as a
//! [`ParsedPayload`] variant, and normalizes structured data into
//! [`CategoryData`].

mod data;
mod parser;

pub use data::*;
pub use parser::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The fixed set of tracked state categories, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "playerStats")]
    PlayerStats,
    #[serde(rename = "sceneInfo")]
    SceneInfo,
    #[serde(rename = "characters")]
    CharacterRoster,
}

impl Category {
    /// All categories in their fixed order.
    pub const ALL: [Category; 3] = [
        Category::PlayerStats,
        Category::SceneInfo,
        Category::CharacterRoster,
    ];

    /// Key of this category inside the unified tracker JSON object.
    pub fn key(&self) -> &'static str {
        match self {
            Category::PlayerStats => "playerStats",
            Category::SceneInfo => "sceneInfo",
            Category::CharacterRoster => "characters",
        }
    }

    /// Look up a category by its unified JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Schema generation a payload was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Free-form text, used verbatim.
    TextLegacy,
    /// Flat structured data: plain maps and comma-separated item strings.
    StructuredV2,
    /// Current JSON schema: record lists and lock wrappers.
    JsonV3,
}

/// A category payload after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    TextLegacy(String),
    StructuredV2(CategoryData),
    JsonV3(CategoryData),
    /// Nothing usable; formats to empty.
    Unknown,
}

impl ParsedPayload {
    /// The schema generation, if the payload was usable at all.
    pub fn version(&self) -> Option<SchemaVersion> {
        match self {
            ParsedPayload::TextLegacy(_) => Some(SchemaVersion::TextLegacy),
            ParsedPayload::StructuredV2(_) => Some(SchemaVersion::StructuredV2),
            ParsedPayload::JsonV3(_) => Some(SchemaVersion::JsonV3),
            ParsedPayload::Unknown => None,
        }
    }

    /// Normalized data for structured payloads of either generation.
    pub fn data(&self) -> Option<&CategoryData> {
        match self {
            ParsedPayload::StructuredV2(data) | ParsedPayload::JsonV3(data) => Some(data),
            _ => None,
        }
    }

    /// Apply `f` to structured data, keeping the schema generation.
    pub fn map_data(self, f: impl FnOnce(CategoryData) -> CategoryData) -> Self {
        match self {
            ParsedPayload::StructuredV2(data) => ParsedPayload::StructuredV2(f(data)),
            ParsedPayload::JsonV3(data) => ParsedPayload::JsonV3(f(data)),
            other => other,
        }
    }
}

/// Raw tracker state for one conversation turn, keyed by category.
///
/// Read-only to this crate. Payloads stay raw until [`parse`] is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TrackerSnapshot {
    payloads: BTreeMap<Category, Value>,
}

impl TrackerSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw payload for a category.
    pub fn with(mut self, category: Category, payload: impl Into<Value>) -> Self {
        self.insert(category, payload);
        self
    }

    /// Set the raw payload for a category.
    pub fn insert(&mut self, category: Category, payload: impl Into<Value>) {
        self.payloads.insert(category, payload.into());
    }

    /// Raw payload for a category.
    pub fn get(&self, category: Category) -> Option<&Value> {
        self.payloads.get(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Categories present, in fixed order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.payloads.keys().copied()
    }

    /// Parse one category. Absent categories are [`ParsedPayload::Unknown`].
    pub fn parse(&self, category: Category) -> ParsedPayload {
        match self.get(category) {
            Some(raw) => parse(raw, category),
            None => ParsedPayload::Unknown,
        }
    }

    /// Parse every present category independently.
    ///
    /// A failure in one category never affects another.
    pub fn parse_all(&self) -> Vec<(Category, ParsedPayload)> {
        self.payloads
            .iter()
            .map(|(category, raw)| (*category, parse(raw, *category)))
            .collect()
    }

    /// Split a unified tracker object into per-category payloads.
    ///
    /// Unrecognized keys are ignored.
    pub fn from_unified(object: &Map<String, Value>) -> Self {
        let payloads = object
            .iter()
            .filter_map(|(key, value)| Category::from_key(key).map(|c| (c, value.clone())))
            .collect();
        Self { payloads }
    }
}

impl From<Map<String, Value>> for TrackerSnapshot {
    fn from(object: Map<String, Value>) -> Self {
        Self::from_unified(&object)
    }
}

impl From<TrackerSnapshot> for Map<String, Value> {
    fn from(snapshot: TrackerSnapshot) -> Self {
        snapshot
            .payloads
            .into_iter()
            .map(|(category, value)| (category.key().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_keys() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
        assert_eq!(Category::from_key("weather"), None);
    }

    #[test]
    fn test_snapshot_from_unified_ignores_unknown_keys() {
        let value = json!({
            "sceneInfo": {"location": "Harbor"},
            "characters": [],
            "spotify": "ignored"
        });
        let snapshot: TrackerSnapshot = serde_json::from_value(value).unwrap();

        assert!(snapshot.get(Category::SceneInfo).is_some());
        assert!(snapshot.get(Category::CharacterRoster).is_some());
        assert!(snapshot.get(Category::PlayerStats).is_none());
        assert_eq!(
            snapshot.categories().collect::<Vec<_>>(),
            vec![Category::SceneInfo, Category::CharacterRoster]
        );
    }

    #[test]
    fn test_snapshot_serializes_with_unified_keys() {
        let snapshot = TrackerSnapshot::new().with(Category::PlayerStats, "HP 5/10");
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, json!({"playerStats": "HP 5/10"}));
    }

    #[test]
    fn test_parse_all_isolates_failures() {
        let snapshot = TrackerSnapshot::new()
            .with(Category::PlayerStats, "{not json")
            .with(Category::SceneInfo, json!({"location": "Docks"}));

        let parsed = snapshot.parse_all();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].1, ParsedPayload::TextLegacy("{not json".to_string()));
        assert!(parsed[1].1.data().is_some());
    }
}
