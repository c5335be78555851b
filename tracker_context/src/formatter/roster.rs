//! Character roster summary.

use tracker_model::{humanize_key, Category, Character, CharacterRoster, FieldValue, TrackerConfig};

use super::labeled;

/// Format each named character as a heading followed by indented fields:
/// details, relationship, thoughts, then stats.
pub fn format_roster(roster: &CharacterRoster, config: &TrackerConfig) -> String {
    roster
        .characters
        .iter()
        .filter_map(|character| format_character(character, config))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_character(character: &Character, config: &TrackerConfig) -> Option<String> {
    let name = character.name.resolve();
    if name.is_empty() {
        return None;
    }

    let enabled = |field: &str| config.field_policy(Category::CharacterRoster, field).enabled;
    let mut lines = vec![name];

    for (key, value) in &character.details {
        if enabled(key.as_str()) {
            lines.extend(labeled(&humanize_key(key), value.resolve()));
        }
    }
    if enabled("relationship") {
        lines.extend(labeled("Relationship", unwrap_sub_field(&character.relationship, "status")));
    }
    if enabled("thoughts") {
        lines.extend(labeled("Thoughts", unwrap_sub_field(&character.thoughts, "content")));
    }
    if enabled("stats") {
        let stats = character
            .stats
            .iter()
            .filter_map(|(key, value)| labeled(&humanize_key(key), value.resolve()))
            .collect::<Vec<_>>()
            .join(", ");
        lines.extend(labeled("Stats", stats));
    }

    let (heading, fields) = lines.split_first()?;
    Some(
        std::iter::once(heading.clone())
            .chain(fields.iter().map(|line| format!("  {}", line)))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Resolve a field that is either a scalar or a record wrapping one sub-field.
fn unwrap_sub_field(value: &FieldValue, key: &str) -> String {
    match value.get(key) {
        Some(inner) => inner.resolve(),
        None => value.resolve(),
    }
}
