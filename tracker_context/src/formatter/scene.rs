//! Scene info summary.

use tracker_model::{humanize_key, Category, SceneInfo, TrackerConfig};

use super::labeled;

/// Scene fields always listed first, in this order.
pub const FIXED_SCENE_FIELDS: [&str; 5] = ["location", "date", "time", "weather", "temperature"];

/// Format the fixed scene fields, then any custom fields in payload order.
pub fn format_scene_info(scene: &SceneInfo, config: &TrackerConfig) -> String {
    let enabled = |field: &str| config.field_policy(Category::SceneInfo, field).enabled;

    let fixed = FIXED_SCENE_FIELDS
        .iter()
        .filter_map(|key| scene.get(key).map(|value| (*key, value)));
    let custom = scene
        .fields
        .iter()
        .filter(|(key, _)| !FIXED_SCENE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value));

    fixed
        .chain(custom)
        .filter(|(key, _)| enabled(*key))
        .filter_map(|(key, value)| labeled(&humanize_key(key), value.resolve()))
        .collect::<Vec<_>>()
        .join("\n")
}
