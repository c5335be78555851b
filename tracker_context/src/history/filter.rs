//! Persistence filtering for historical snapshots.
//!
//! A field survives when `include_all_enabled` is set and the field is not
//! disabled, or when it is explicitly marked to persist in history. Nothing
//! survives by default.

use tracker_model::{
    Category, CategoryData, Character, CharacterRoster, FieldPolicy, FieldValue, Inventory,
    ParsedPayload, PlayerStats, Quests, SceneInfo, Skills, TrackerConfig,
};

/// Decide whether a field with `policy` is carried into history.
pub fn is_persisted(policy: FieldPolicy, include_all_enabled: bool) -> bool {
    if include_all_enabled {
        policy.enabled
    } else {
        policy.persist_in_history
    }
}

/// Keep only the persisted fields of a parsed payload.
///
/// Legacy text has no fields to select from, so it is kept only when every
/// enabled field is included.
pub fn filter_payload(
    payload: ParsedPayload,
    category: Category,
    config: &TrackerConfig,
    include_all_enabled: bool,
) -> ParsedPayload {
    let keep = |field: &str| is_persisted(config.field_policy(category, field), include_all_enabled);

    match payload {
        ParsedPayload::TextLegacy(_) if !include_all_enabled => ParsedPayload::Unknown,
        other => other.map_data(|data| match data {
            CategoryData::PlayerStats(stats) => CategoryData::PlayerStats(filter_player_stats(stats, &keep)),
            CategoryData::SceneInfo(scene) => CategoryData::SceneInfo(filter_scene(scene, &keep)),
            CategoryData::CharacterRoster(roster) => {
                CategoryData::CharacterRoster(filter_roster(roster, &keep))
            }
        }),
    }
}

fn filter_player_stats(stats: PlayerStats, keep: &dyn Fn(&str) -> bool) -> PlayerStats {
    PlayerStats {
        stats: stats.stats.into_iter().filter(|s| keep(s.id.as_str())).collect(),
        status: if keep("status") { stats.status } else { FieldValue::Empty },
        skills: if keep("skills") { stats.skills } else { Skills::None },
        inventory: if keep("inventory") { stats.inventory } else { Inventory::default() },
        quests: if keep("quests") { stats.quests } else { Quests::default() },
    }
}

fn filter_scene(scene: SceneInfo, keep: &dyn Fn(&str) -> bool) -> SceneInfo {
    SceneInfo {
        fields: scene.fields.into_iter().filter(|(k, _)| keep(k.as_str())).collect(),
    }
}

fn filter_roster(roster: CharacterRoster, keep: &dyn Fn(&str) -> bool) -> CharacterRoster {
    let characters = roster
        .characters
        .into_iter()
        .map(|c| Character {
            name: c.name,
            details: c.details.into_iter().filter(|(k, _)| keep(k.as_str())).collect(),
            relationship: if keep("relationship") { c.relationship } else { FieldValue::Empty },
            thoughts: if keep("thoughts") { c.thoughts } else { FieldValue::Empty },
            stats: if keep("stats") { c.stats } else { Vec::new() },
        })
        // A bare name carries no persisted state
        .filter(|c| {
            !c.details.is_empty() || !c.relationship.is_blank() || !c.thoughts.is_blank() || !c.stats.is_empty()
        })
        .collect();

    CharacterRoster { characters }
}
