//! Tracker Parser - detects the schema generation and normalizes payloads.
//!
//! Detection is a strict JSON parse. Anything that does not parse into an
//! object or array is legacy text and is kept verbatim. Structured payloads
//! are then normalized per category; a shape mismatch falls back to legacy
//! text when the raw payload was text, and is skipped otherwise. Failures are
//! logged, never returned.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    Category, CategoryData, Character, CharacterRoster, Inventory, ParsedPayload, PlayerStats,
    Quests, SceneInfo, SchemaVersion, Skills, StatEntry, TrackerSnapshot,
};
use crate::error::TrackerError;
use crate::value::{FieldValue, Record};

/// Keys of a player stats object that are never numeric stats.
const PLAYER_SECTION_KEYS: &[&str] = &[
    "stats",
    "status",
    "skills",
    "inventory",
    "quests",
    "mood",
    "conditions",
    "version",
];

/// Keys of a character object handled outside its details.
const CHARACTER_KEYS: &[&str] = &["name", "details", "relationship", "thoughts", "stats"];

/// Parse a raw category payload.
pub fn parse(raw: &Value, category: Category) -> ParsedPayload {
    match raw {
        Value::Null => ParsedPayload::Unknown,
        Value::String(text) => parse_text(text, category),
        Value::Object(_) | Value::Array(_) => match parse_structured(raw, category) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%category, error = %err, "skipping tracker payload");
                ParsedPayload::Unknown
            }
        },
        other => {
            warn!(%category, kind = kind(other), "tracker payload is neither text nor structured data");
            ParsedPayload::Unknown
        }
    }
}

fn parse_text(text: &str, category: Category) -> ParsedPayload {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedPayload::Unknown;
    }

    let value = match structured_text(trimmed, category) {
        Ok(value) => value,
        Err(err) => {
            debug!(%category, error = %err, "treating payload as legacy text");
            return ParsedPayload::TextLegacy(text.to_string());
        }
    };

    match parse_structured(&value, category) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%category, error = %err, "falling back to legacy text");
            ParsedPayload::TextLegacy(text.to_string())
        }
    }
}

/// Strict parse of text into an object or list.
fn structured_text(text: &str, category: Category) -> Result<Value, TrackerError> {
    match serde_json::from_str::<Value>(strip_code_fence(text)) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(other) => Err(TrackerError::MalformedPayload {
            category,
            reason: format!("expected an object or list, found {}", kind(&other)),
        }),
        Err(err) => Err(TrackerError::MalformedPayload {
            category,
            reason: err.to_string(),
        }),
    }
}

fn parse_structured(value: &Value, category: Category) -> Result<ParsedPayload, TrackerError> {
    let data = match category {
        Category::PlayerStats => CategoryData::PlayerStats(normalize_player_stats(value)?),
        Category::SceneInfo => CategoryData::SceneInfo(normalize_scene_info(value)?),
        Category::CharacterRoster => CategoryData::CharacterRoster(normalize_roster(value)?),
    };

    Ok(match detect_version(value, category) {
        SchemaVersion::JsonV3 => ParsedPayload::JsonV3(data),
        _ => ParsedPayload::StructuredV2(data),
    })
}

/// Decide which structured generation a payload was written in.
///
/// Lock wrappers only exist in the current schema. Beyond that, each category
/// has one shape the older schema never produced.
pub fn detect_version(value: &Value, category: Category) -> SchemaVersion {
    if contains_lock_wrapper(value) {
        return SchemaVersion::JsonV3;
    }

    let current = match category {
        Category::PlayerStats => matches!(value.get("stats").map(unwrap_locks), Some(Value::Array(_))),
        Category::SceneInfo => value
            .as_object()
            .is_some_and(|fields| fields.values().any(Value::is_object)),
        Category::CharacterRoster => roster_entries(value).is_some_and(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .any(|c| c.values().any(Value::is_object))
        }),
    };

    if current {
        SchemaVersion::JsonV3
    } else {
        SchemaVersion::StructuredV2
    }
}

/// Strip a surrounding markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Extract the unified tracker object from a model response.
///
/// Looks for a fenced JSON block first, then the outermost brace span.
/// Returns an empty snapshot when nothing parses.
pub fn extract_snapshot(response: &str) -> TrackerSnapshot {
    let Some(candidate) = fenced_json(response).or_else(|| brace_span(response)) else {
        debug!("no tracker object found in response");
        return TrackerSnapshot::new();
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => TrackerSnapshot::from_unified(&object),
        Ok(other) => {
            warn!(kind = kind(&other), "tracker block is not a JSON object");
            TrackerSnapshot::new()
        }
        Err(err) => {
            warn!(error = %err, "tracker block failed to parse");
            TrackerSnapshot::new()
        }
    }
}

fn fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn normalize_player_stats(value: &Value) -> Result<PlayerStats, TrackerError> {
    let map = expect_object(value, Category::PlayerStats)?;

    let stats = match map.get("stats").map(unwrap_locks) {
        Some(Value::Array(entries)) => entries.iter().filter_map(stat_entry).collect(),
        Some(Value::Object(fields)) => fields.iter().map(|(id, v)| stat_pair(id, v)).collect(),
        // Oldest structured form keeps numeric stats at the top level
        _ => map
            .iter()
            .filter(|(k, _)| !PLAYER_SECTION_KEYS.contains(&k.as_str()))
            .filter(|(_, v)| FieldValue::from_json(v).as_number().is_some())
            .map(|(id, v)| stat_pair(id, v))
            .collect(),
    };

    let status = match map.get("status") {
        Some(status) => FieldValue::from_json(status),
        None if map.contains_key("mood") || map.contains_key("conditions") => {
            FieldValue::Record(Record::new(vec![
                ("mood".to_string(), field(map, "mood")),
                ("conditions".to_string(), field(map, "conditions")),
            ]))
        }
        None => FieldValue::Empty,
    };

    let skills = match map.get("skills").map(unwrap_locks) {
        Some(Value::Array(items)) => Skills::Names(items.iter().map(FieldValue::from_json).collect()),
        Some(Value::Object(levels)) => Skills::Levels(entries(levels)),
        Some(text @ Value::String(_)) => Skills::Names(vec![FieldValue::from_json(text)]),
        _ => Skills::None,
    };

    let inventory = match map.get("inventory").map(unwrap_locks) {
        Some(Value::Object(inv)) => Inventory {
            on_person: field(inv, "onPerson"),
            clothing: field(inv, "clothing"),
            stored: match inv.get("stored").map(unwrap_locks) {
                Some(Value::Object(locations)) => entries(locations),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![(String::new(), FieldValue::from_json(other))],
            },
            assets: field(inv, "assets"),
        },
        Some(items @ (Value::String(_) | Value::Array(_))) => Inventory {
            on_person: FieldValue::from_json(items),
            ..Default::default()
        },
        _ => Inventory::default(),
    };

    let quests = match map.get("quests").map(unwrap_locks) {
        Some(Value::Object(q)) => Quests {
            main: field(q, "main"),
            optional: field(q, "optional"),
        },
        Some(main @ Value::String(_)) => Quests {
            main: FieldValue::from_json(main),
            ..Default::default()
        },
        Some(optional @ Value::Array(_)) => Quests {
            optional: FieldValue::from_json(optional),
            ..Default::default()
        },
        _ => Quests::default(),
    };

    Ok(PlayerStats {
        stats,
        status,
        skills,
        inventory,
        quests,
    })
}

fn stat_entry(entry: &Value) -> Option<StatEntry> {
    let object = entry.as_object()?;
    let id = scalar_text(object.get("id"));
    let name = scalar_text(object.get("name"));

    // A missing name stays empty so the configured stat name can apply
    let (id, name) = match (id, name) {
        (Some(id), name) => (id, name.unwrap_or_default()),
        (None, Some(name)) => (name.clone(), name),
        (None, None) => return None,
    };

    Some(StatEntry {
        id,
        name,
        value: object.get("value").map(FieldValue::from_json).unwrap_or_default(),
    })
}

fn stat_pair(id: &str, value: &Value) -> StatEntry {
    StatEntry {
        id: id.to_string(),
        name: String::new(),
        value: FieldValue::from_json(value),
    }
}

fn normalize_scene_info(value: &Value) -> Result<SceneInfo, TrackerError> {
    let map = expect_object(value, Category::SceneInfo)?;
    let fields = map
        .iter()
        .filter(|(k, _)| k.as_str() != "version")
        .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
        .collect();
    Ok(SceneInfo { fields })
}

fn normalize_roster(value: &Value) -> Result<CharacterRoster, TrackerError> {
    let entries = roster_entries(value).ok_or_else(|| TrackerError::UnknownShape {
        category: Category::CharacterRoster,
        detail: format!("expected a character list, found {}", kind(unwrap_locks(value))),
    })?;

    Ok(CharacterRoster {
        characters: entries.iter().filter_map(normalize_character).collect(),
    })
}

fn roster_entries(value: &Value) -> Option<&Vec<Value>> {
    match unwrap_locks(value) {
        Value::Array(items) => Some(items),
        Value::Object(map) => match map.get("characters").map(unwrap_locks) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn normalize_character(value: &Value) -> Option<Character> {
    let map = unwrap_locks(value).as_object()?;

    let mut details = match map.get("details").map(unwrap_locks) {
        Some(Value::Object(d)) => entries(d),
        _ => Vec::new(),
    };
    // Older rosters keep detail fields alongside the name
    details.extend(
        map.iter()
            .filter(|(k, _)| !CHARACTER_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), FieldValue::from_json(v))),
    );

    let stats = match map.get("stats").map(unwrap_locks) {
        Some(Value::Object(s)) => entries(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|s| {
                let name = scalar_text(s.get("name")).or_else(|| scalar_text(s.get("id")))?;
                Some((name, field(s, "value")))
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(Character {
        name: field(map, "name"),
        details,
        relationship: field(map, "relationship"),
        thoughts: field(map, "thoughts"),
        stats,
    })
}

fn expect_object(value: &Value, category: Category) -> Result<&Map<String, Value>, TrackerError> {
    match unwrap_locks(value) {
        Value::Object(map) => Ok(map),
        other => Err(TrackerError::UnknownShape {
            category,
            detail: format!("expected an object, found {}", kind(other)),
        }),
    }
}

/// Strip lock wrappers from a container value.
fn unwrap_locks(value: &Value) -> &Value {
    let mut current = value;
    while let Some(inner) = current.as_object().and_then(|m| m.get("value")) {
        current = inner;
    }
    current
}

fn contains_lock_wrapper(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            (map.contains_key("value") && map.contains_key("locked"))
                || map.values().any(contains_lock_wrapper)
        }
        Value::Array(items) => items.iter().any(contains_lock_wrapper),
        _ => false,
    }
}

fn field(map: &Map<String, Value>, key: &str) -> FieldValue {
    map.get(key).map(FieldValue::from_json).unwrap_or_default()
}

fn entries(map: &Map<String, Value>) -> Vec<(String, FieldValue)> {
    map.iter()
        .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
        .collect()
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    let text = value.map(FieldValue::from_json)?.resolve();
    (!text.is_empty()).then_some(text)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn player(payload: ParsedPayload) -> PlayerStats {
        match payload.data() {
            Some(CategoryData::PlayerStats(stats)) => stats.clone(),
            other => panic!("expected player stats, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_text_keeps_surrounding_whitespace() {
        let raw = json!("  HP 5  \n");
        assert_eq!(
            parse(&raw, Category::PlayerStats),
            ParsedPayload::TextLegacy("  HP 5  \n".to_string())
        );
    }

    #[test]
    fn test_unstructured_text_is_malformed() {
        let err = structured_text("42", Category::SceneInfo).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPayload { category: Category::SceneInfo, .. }));
        assert!(err.to_string().contains("found a number"));

        let err = structured_text("{\"hp\": ", Category::SceneInfo).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPayload { .. }));
    }

    #[test]
    fn test_plain_text_is_legacy() {
        let raw = json!("Health: 80/100\nMood: 😊");
        assert_eq!(
            parse(&raw, Category::PlayerStats),
            ParsedPayload::TextLegacy("Health: 80/100\nMood: 😊".to_string())
        );
    }

    #[test]
    fn test_empty_and_null_are_unknown() {
        assert_eq!(parse(&json!(null), Category::SceneInfo), ParsedPayload::Unknown);
        assert_eq!(parse(&json!("   "), Category::SceneInfo), ParsedPayload::Unknown);
        assert_eq!(parse(&json!(42), Category::SceneInfo), ParsedPayload::Unknown);
    }

    #[test]
    fn test_fenced_json_text_is_structured() {
        let raw = json!("```json\n{\"location\": \"Market\"}\n```");
        let parsed = parse(&raw, Category::SceneInfo);
        assert_eq!(parsed.version(), Some(SchemaVersion::StructuredV2));
        match parsed.data() {
            Some(CategoryData::SceneInfo(scene)) => {
                assert_eq!(scene.get("location"), Some(&FieldValue::text("Market")));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_v3_player_stats() {
        let raw = json!({
            "stats": [
                {"id": "hp", "name": "HP", "value": 7},
                {"id": "mana", "value": {"value": 3, "locked": true}}
            ],
            "status": {"mood": "😤", "conditions": "Bruised"},
            "skills": {"value": ["Archery"], "locked": true},
            "inventory": {
                "onPerson": [{"name": "Arrow", "quantity": 20}],
                "stored": {"Camp": ["Tent"]}
            },
            "quests": {"main": {"title": "Reach the pass"}, "optional": []}
        });

        let parsed = parse(&raw, Category::PlayerStats);
        assert_eq!(parsed.version(), Some(SchemaVersion::JsonV3));

        let stats = player(parsed);
        assert_eq!(stats.stats.len(), 2);
        assert_eq!(stats.stats[0].name, "HP");
        assert_eq!(stats.stats[1].name, "");
        assert_eq!(stats.stats[1].value.as_number(), Some(3.0));
        assert_eq!(stats.status.resolve(), "😤 - Bruised");
        assert_eq!(stats.skills, Skills::Names(vec![FieldValue::text("Archery")]));
        assert_eq!(stats.inventory.on_person.resolve(), "Arrow (x20)");
        assert_eq!(stats.inventory.stored[0].0, "Camp");
        assert_eq!(stats.quests.main.resolve(), "Reach the pass");
    }

    #[test]
    fn test_v2_player_stats_with_top_level_numbers() {
        let raw = json!({
            "health": 80,
            "satiety": "65",
            "mood": "🙂",
            "conditions": "Hungry",
            "inventory": {"version": 2, "onPerson": "Rope, Flint", "assets": "None"}
        });

        let parsed = parse(&raw, Category::PlayerStats);
        assert_eq!(parsed.version(), Some(SchemaVersion::StructuredV2));

        let stats = player(parsed);
        let ids: Vec<_> = stats.stats.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["health", "satiety"]);
        assert_eq!(stats.stats[0].name, "");
        assert_eq!(stats.status.resolve(), "🙂 - Hungry");
        assert_eq!(stats.inventory.on_person.resolve(), "Rope, Flint");
        assert!(stats.skills.is_empty());
    }

    #[test]
    fn test_shape_mismatch_falls_back_to_text_or_skips() {
        // Parses as JSON, but a scene must be an object
        let text = json!("[\"not\", \"a\", \"scene\"]");
        assert_eq!(
            parse(&text, Category::SceneInfo),
            ParsedPayload::TextLegacy("[\"not\", \"a\", \"scene\"]".to_string())
        );

        let structured = json!(["not", "a", "scene"]);
        assert_eq!(parse(&structured, Category::SceneInfo), ParsedPayload::Unknown);
    }

    #[test]
    fn test_scene_version_detection() {
        let v2 = json!({"location": "Inn", "weather": "Rain"});
        let v3 = json!({"location": "Inn", "weather": {"emoji": "🌧️", "forecast": "Rain"}});
        assert_eq!(detect_version(&v2, Category::SceneInfo), SchemaVersion::StructuredV2);
        assert_eq!(detect_version(&v3, Category::SceneInfo), SchemaVersion::JsonV3);
    }

    #[test]
    fn test_roster_shapes() {
        let wrapped = json!({"characters": [
            {"name": "Mira", "emoji": "🧝", "details": {"appearance": "Tall"}, "thoughts": {"content": "Curious"}},
            "not a character"
        ]});

        let parsed = parse(&wrapped, Category::CharacterRoster);
        assert_eq!(parsed.version(), Some(SchemaVersion::JsonV3));
        match parsed.data() {
            Some(CategoryData::CharacterRoster(roster)) => {
                assert_eq!(roster.characters.len(), 1);
                let mira = &roster.characters[0];
                assert_eq!(mira.name.resolve(), "Mira");
                let keys: Vec<_> = mira.details.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["appearance", "emoji"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(parse(&json!({"who": "knows"}), Category::CharacterRoster), ParsedPayload::Unknown);
    }

    #[test]
    fn test_roster_stat_list() {
        let raw = json!([{"name": "Bram", "stats": [{"name": "Trust", "value": 40}, {"value": 2}]}]);
        match parse(&raw, Category::CharacterRoster).data() {
            Some(CategoryData::CharacterRoster(roster)) => {
                assert_eq!(roster.characters[0].stats, vec![("Trust".to_string(), FieldValue::number(40.0))]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_extract_snapshot_from_response() {
        let response = "The rain eases.\n\n```json\n{\n  \"sceneInfo\": {\"location\": \"Bridge\"},\n  \"characters\": []\n}\n```";
        let snapshot = extract_snapshot(response);
        assert_eq!(snapshot.get(Category::SceneInfo), Some(&json!({"location": "Bridge"})));
        assert!(snapshot.get(Category::PlayerStats).is_none());

        let bare = "Story text {\"playerStats\": {\"stats\": []}} trailing";
        assert!(extract_snapshot(bare).get(Category::PlayerStats).is_some());

        assert!(extract_snapshot("no tracker here").is_empty());
        assert!(extract_snapshot("{ broken").is_empty());
    }
}
