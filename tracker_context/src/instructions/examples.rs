//! Per-category JSON shape examples for the instruction block.
//!
//! Examples are built as JSON values and pretty-printed, so every example is
//! valid JSON no matter what the configuration or display name contains.

use serde_json::{json, Map, Value};
use tracker_model::{humanize_key, Category, TrackerConfig, DEFAULT_STAT_MAX};

use crate::formatter::FIXED_SCENE_FIELDS;

/// Example value for one category, shaped after the current schema.
pub fn category_example(category: Category, config: &TrackerConfig, display_name: &str) -> Value {
    match category {
        Category::PlayerStats => player_stats_example(config, display_name),
        Category::SceneInfo => scene_info_example(config),
        Category::CharacterRoster => roster_example(config, display_name),
    }
}

fn player_stats_example(config: &TrackerConfig, display_name: &str) -> Value {
    let enabled = |field: &str| config.field_policy(Category::PlayerStats, field).enabled;
    let mut example = Map::new();

    let stats: Vec<Value> = config
        .player_stats
        .custom_stats
        .iter()
        .filter(|stat| stat.policy.enabled)
        .map(|stat| {
            let name = if stat.name.is_empty() {
                humanize_key(&stat.id)
            } else {
                stat.name.clone()
            };
            json!({
                "id": stat.id,
                "name": name,
                "value": stat.max_value.unwrap_or(DEFAULT_STAT_MAX),
            })
        })
        .collect();
    if !stats.is_empty() {
        example.insert("stats".to_string(), Value::Array(stats));
    }

    if enabled("status") {
        example.insert(
            "status".to_string(),
            json!({
                "mood": format!("[Emoji for {}'s mood]", display_name),
                "conditions": "[Physical or mental conditions, comma separated]",
            }),
        );
    }
    if enabled("skills") {
        example.insert("skills".to_string(), json!(["[Skill name]"]));
    }
    if enabled("inventory") {
        example.insert(
            "inventory".to_string(),
            json!({
                "onPerson": [{"name": "[Item carried]", "quantity": 1}],
                "clothing": ["[Item worn]"],
                "stored": {"[Location]": ["[Item kept there]"]},
                "assets": ["[Property, vehicle or other holding]"],
            }),
        );
    }
    if enabled("quests") {
        example.insert(
            "quests".to_string(),
            json!({
                "main": {"title": "[Current main objective]"},
                "optional": [{"title": "[Side objective]"}],
            }),
        );
    }

    Value::Object(example)
}

fn scene_info_example(config: &TrackerConfig) -> Value {
    let fixed = FIXED_SCENE_FIELDS.into_iter().zip([
        json!("[Specific place]"),
        json!("[Weekday, Month Day, Year]"),
        json!({"start": "[HH:MM]", "end": "[HH:MM]"}),
        json!({"emoji": "[Weather emoji]", "forecast": "[Short forecast]"}),
        json!("[Temperature with unit]"),
    ]);

    let custom = config
        .scene_info
        .custom_fields
        .iter()
        .map(|field| (field.key.as_str(), json!(placeholder(&field.description, &field.key))));

    let example: Map<String, Value> = fixed
        .into_iter()
        .chain(custom)
        .filter(|(key, _)| config.field_policy(Category::SceneInfo, *key).enabled)
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    Value::Object(example)
}

fn roster_example(config: &TrackerConfig, display_name: &str) -> Value {
    let enabled = |field: &str| config.field_policy(Category::CharacterRoster, field).enabled;
    let mut character = Map::new();
    character.insert("name".to_string(), json!("[Character name]"));

    let details: Map<String, Value> = config
        .character_roster
        .detail_fields
        .iter()
        .filter(|field| enabled(field.key.as_str()))
        .map(|field| (field.key.clone(), json!(placeholder(&field.description, &field.key))))
        .collect();
    if !details.is_empty() {
        character.insert("details".to_string(), Value::Object(details));
    }

    if enabled("relationship") {
        character.insert(
            "relationship".to_string(),
            json!({"status": format!("[Standing toward {}: Enemy, Neutral, Friend or Lover]", display_name)}),
        );
    }
    if enabled("thoughts") {
        character.insert(
            "thoughts".to_string(),
            json!({"content": "[Private thoughts in first person]"}),
        );
    }
    if enabled("stats") {
        character.insert(
            "stats".to_string(),
            json!([{"name": "[Stat name]", "value": 50}]),
        );
    }

    json!([Value::Object(character)])
}

fn placeholder(description: &str, key: &str) -> String {
    let hint = description.trim();
    if hint.is_empty() {
        format!("[{}]", key)
    } else {
        format!("[{}]", hint)
    }
}
