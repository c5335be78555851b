//! Context Formatter - flattens a snapshot into a human-readable summary.
//!
//! Each category has a fixed extraction order. Missing or empty fields are
//! omitted silently; a snapshot that yields nothing formats to `""`.

mod player;
mod roster;
mod scene;

pub use player::*;
pub use roster::*;
pub use scene::*;

use tracker_model::{Category, CategoryData, ParsedPayload, TrackerConfig, TrackerSnapshot};

/// Placeholder replaced by the active user's display name.
pub const USER_PLACEHOLDER: &str = "{{user}}";

/// Formats parsed tracker state using the display configuration.
pub struct ContextFormatter<'a> {
    config: &'a TrackerConfig,
}

impl<'a> ContextFormatter<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    /// Format one category of a raw snapshot.
    pub fn format(&self, snapshot: &TrackerSnapshot, category: Category, display_name: &str) -> String {
        self.format_payload(&snapshot.parse(category), display_name)
    }

    /// Format an already parsed payload.
    ///
    /// Legacy text is used verbatim; structured data goes through the
    /// category formatter.
    pub fn format_payload(&self, payload: &ParsedPayload, display_name: &str) -> String {
        let text = match payload {
            ParsedPayload::TextLegacy(text) => text.trim().to_string(),
            ParsedPayload::StructuredV2(data) | ParsedPayload::JsonV3(data) => match data {
                CategoryData::PlayerStats(stats) => format_player_stats(stats, self.config),
                CategoryData::SceneInfo(scene) => format_scene_info(scene, self.config),
                CategoryData::CharacterRoster(roster) => format_roster(roster, self.config),
            },
            ParsedPayload::Unknown => String::new(),
        };
        substitute_user(&text, display_name)
    }

    /// Summarize every enabled category of a snapshot, each under a heading.
    pub fn format_snapshot(&self, snapshot: &TrackerSnapshot, display_name: &str) -> String {
        let parsed: Vec<_> = self
            .config
            .enabled_categories()
            .into_iter()
            .map(|category| (category, snapshot.parse(category)))
            .collect();
        self.format_parsed(&parsed, display_name)
    }

    /// Summarize parsed payloads in the order given, skipping empty ones.
    pub fn format_parsed(&self, payloads: &[(Category, ParsedPayload)], display_name: &str) -> String {
        payloads
            .iter()
            .filter_map(|(category, payload)| {
                let body = self.format_payload(payload, display_name);
                (!body.is_empty()).then(|| format!("{}\n{}", heading(*category, display_name), body))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn heading(category: Category, display_name: &str) -> String {
    match category {
        Category::PlayerStats => format!("{}'s Stats:", display_name),
        Category::SceneInfo => "Scene:".to_string(),
        Category::CharacterRoster => "Present Characters:".to_string(),
    }
}

/// Replace the user placeholder with a display name.
pub fn substitute_user(text: &str, display_name: &str) -> String {
    text.replace(USER_PLACEHOLDER, display_name)
}

/// `Label: value`, or `None` when the value is empty.
pub(crate) fn labeled(label: &str, value: String) -> Option<String> {
    (!value.is_empty()).then(|| format!("{}: {}", label, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_snapshot_formats_to_empty() {
        let config = TrackerConfig::default();
        let formatter = ContextFormatter::new(&config);
        let snapshot = TrackerSnapshot::new();

        for category in Category::ALL {
            assert_eq!(formatter.format(&snapshot, category, "Ava"), "");
        }
        assert_eq!(formatter.format_snapshot(&snapshot, "Ava"), "");
    }

    #[test]
    fn test_unparseable_structured_payload_is_empty() {
        let config = TrackerConfig::default();
        let formatter = ContextFormatter::new(&config);
        let snapshot = TrackerSnapshot::new().with(Category::SceneInfo, json!([1, 2, 3]));

        assert_eq!(formatter.format(&snapshot, Category::SceneInfo, "Ava"), "");
    }

    #[test]
    fn test_legacy_text_is_verbatim_with_user_substituted() {
        let config = TrackerConfig::default();
        let formatter = ContextFormatter::new(&config);
        let snapshot = TrackerSnapshot::new().with(Category::PlayerStats, "  {{user}} is tired.\nHealth: 40%  ");

        assert_eq!(
            formatter.format(&snapshot, Category::PlayerStats, "Ava"),
            "Ava is tired.\nHealth: 40%"
        );
    }

    #[test]
    fn test_format_snapshot_headings_and_independent_fallback() {
        let config = TrackerConfig::default();
        let formatter = ContextFormatter::new(&config);
        let snapshot = TrackerSnapshot::new()
            .with(Category::PlayerStats, "Health: 90")
            .with(Category::SceneInfo, json!({"location": "Harbor"}))
            .with(Category::CharacterRoster, json!(7));

        assert_eq!(
            formatter.format_snapshot(&snapshot, "Ava"),
            "Ava's Stats:\nHealth: 90\n\nScene:\nLocation: Harbor"
        );
    }

    #[test]
    fn test_disabled_category_is_left_out_of_summary() {
        let mut config = TrackerConfig::default();
        config.scene_info.enabled = false;
        let formatter = ContextFormatter::new(&config);
        let snapshot = TrackerSnapshot::new().with(Category::SceneInfo, json!({"location": "Harbor"}));

        assert_eq!(formatter.format_snapshot(&snapshot, "Ava"), "");
    }
}
