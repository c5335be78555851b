//! Player stats summary.

use tracing::debug;
use tracker_model::{
    format_number, humanize_key, Category, DisplayMode, FieldValue, Inventory, PlayerStats, Quests,
    Skills, StatEntry, TrackerConfig, DEFAULT_STAT_MAX,
};

use super::labeled;

/// Format player stats in fixed order: stats, status, skills, inventory, quests.
pub fn format_player_stats(stats: &PlayerStats, config: &TrackerConfig) -> String {
    let enabled = |field: &str| config.field_policy(Category::PlayerStats, field).enabled;
    let mut lines = Vec::new();

    lines.extend(
        stats
            .stats
            .iter()
            .filter(|stat| enabled(stat.id.as_str()))
            .filter_map(|stat| stat_line(stat, config)),
    );

    if enabled("status") {
        lines.extend(labeled("Status", stats.status.resolve()));
    }
    if enabled("skills") {
        lines.extend(labeled("Skills", skills_text(&stats.skills)));
    }
    if enabled("inventory") {
        lines.extend(inventory_lines(&stats.inventory));
    }
    if enabled("quests") {
        lines.extend(quest_lines(&stats.quests));
    }

    lines.join("\n")
}

fn stat_line(stat: &StatEntry, config: &TrackerConfig) -> Option<String> {
    let name = if !stat.name.is_empty() {
        stat.name.clone()
    } else {
        config
            .custom_stat(&stat.id)
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| humanize_key(&stat.id))
    };

    let value = match (stat.value.as_number(), config.player_stats.display_mode) {
        (Some(n), DisplayMode::Number) => {
            let max = config.stat_max(&stat.id).unwrap_or_else(|err| {
                debug!(error = %err, "using default stat maximum");
                DEFAULT_STAT_MAX
            });
            format!("{}/{}", format_number(n), format_number(max))
        }
        (Some(n), DisplayMode::Percentage) => format!("{}%", format_number(n)),
        (None, _) => stat.value.resolve(),
    };

    labeled(&name, value)
}

fn skills_text(skills: &Skills) -> String {
    match skills {
        Skills::None => String::new(),
        Skills::Names(names) => FieldValue::List(names.clone()).resolve(),
        Skills::Levels(levels) => levels
            .iter()
            .map(|(name, level)| match level.resolve() {
                level if level.is_empty() => name.clone(),
                level => format!("{} ({})", name, level),
            })
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn inventory_lines(inventory: &Inventory) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(labeled("On Person", inventory.on_person.resolve()));
    lines.extend(labeled("Clothing", inventory.clothing.resolve()));
    for (location, items) in &inventory.stored {
        let label = if location.is_empty() {
            "Stored".to_string()
        } else {
            format!("Stored ({})", location)
        };
        lines.extend(labeled(&label, items.resolve()));
    }
    lines.extend(labeled("Assets", inventory.assets.resolve()));
    lines
}

fn quest_lines(quests: &Quests) -> Vec<String> {
    labeled("Main Quest", quests.main.resolve())
        .into_iter()
        .chain(labeled("Optional Quests", quests.optional.resolve()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tracker_model::{parse, CategoryData, CustomStat};

    fn stats_from(raw: Value) -> PlayerStats {
        match parse(&raw, Category::PlayerStats).data() {
            Some(CategoryData::PlayerStats(stats)) => stats.clone(),
            other => panic!("expected player stats, got {:?}", other),
        }
    }

    fn config_with_hp(max: f64) -> TrackerConfig {
        let mut config = TrackerConfig::default();
        config.player_stats.custom_stats = vec![CustomStat {
            id: "hp".to_string(),
            max_value: Some(max),
            ..Default::default()
        }];
        config
    }

    #[test]
    fn test_configured_name_used_when_payload_has_none() {
        let mut config = TrackerConfig::default();
        config.player_stats.custom_stats = vec![CustomStat::new("hp", "Hit Points").with_max(10.0)];

        let stats = stats_from(json!({"stats": [{"id": "hp", "value": 7}]}));
        let output = format_player_stats(&stats, &config);
        assert!(output.lines().any(|l| l == "Hit Points: 7/10"), "got {:?}", output);

        let stats = stats_from(json!({"stats": [{"id": "hp", "name": "HP", "value": 7}]}));
        let output = format_player_stats(&stats, &config);
        assert!(output.lines().any(|l| l == "HP: 7/10"), "got {:?}", output);

        let stats = stats_from(json!({"stats": [{"id": "stamina_left", "value": 3}]}));
        let output = format_player_stats(&stats, &config);
        assert!(output.lines().any(|l| l.starts_with("Stamina Left: 3/")), "got {:?}", output);
    }

    #[test]
    fn test_number_mode_uses_configured_max() {
        let stats = stats_from(json!({"stats": [{"id": "hp", "name": "HP", "value": 7}]}));
        let output = format_player_stats(&stats, &config_with_hp(10.0));

        assert!(output.lines().any(|l| l == "HP: 7/10"), "got {:?}", output);
    }

    #[test]
    fn test_percentage_mode() {
        let stats = stats_from(json!({"stats": [{"id": "hp", "name": "HP", "value": 70}]}));
        let mut config = config_with_hp(10.0);
        config.player_stats.display_mode = DisplayMode::Percentage;

        assert_eq!(format_player_stats(&stats, &config), "HP: 70%");
    }

    #[test]
    fn test_missing_max_defaults_to_hundred() {
        let stats = stats_from(json!({"stats": [{"id": "focus", "value": {"value": 55, "locked": true}}]}));
        assert_eq!(format_player_stats(&stats, &TrackerConfig::default()), "Focus: 55/100");
    }

    #[test]
    fn test_non_numeric_stat_is_shown_as_is() {
        let stats = stats_from(json!({"stats": [{"id": "hp", "name": "HP", "value": "unknown"}]}));
        assert_eq!(format_player_stats(&stats, &config_with_hp(10.0)), "HP: unknown");
    }

    #[test]
    fn test_full_extraction_order() {
        let stats = stats_from(json!({
            "quests": {"main": {"title": "Find the map"}, "optional": [{"title": "Feed the cat"}]},
            "inventory": {
                "onPerson": [{"name": "Torch", "quantity": 2}, "Knife"],
                "clothing": ["Wool cloak"],
                "stored": {"Inn Room": ["Spare boots"], "Empty Chest": []},
                "assets": "Rowboat"
            },
            "skills": {"Lockpicking": 2, "Swimming": ""},
            "status": {"mood": "😌", "conditions": "Well rested"},
            "stats": [{"id": "hp", "name": "HP", "value": 9}]
        }));

        let expected = "\
HP: 9/10
Status: 😌 - Well rested
Skills: Lockpicking (2), Swimming
On Person: Torch (x2), Knife
Clothing: Wool cloak
Stored (Inn Room): Spare boots
Assets: Rowboat
Main Quest: Find the map
Optional Quests: Feed the cat";

        assert_eq!(format_player_stats(&stats, &config_with_hp(10.0)), expected);
    }

    #[test]
    fn test_disabled_fields_are_omitted() {
        let stats = stats_from(json!({
            "stats": [{"id": "hp", "name": "HP", "value": 9}],
            "skills": ["Cooking"]
        }));
        let mut config = config_with_hp(10.0);
        config.player_stats.custom_stats[0].policy.enabled = false;
        config
            .player_stats
            .fields
            .insert("skills".to_string(), tracker_model::FieldPolicy { enabled: false, persist_in_history: false });

        assert_eq!(format_player_stats(&stats, &config), "");
    }
}
