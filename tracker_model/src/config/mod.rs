//! Tracker configuration - which categories and fields are active, how they
//! display, and whether they persist into historical context.
//!
//! Owned by the host application and read-only here. Every field has a
//! default, so a missing entry behaves as enabled and not persisted.

mod history;

pub use history::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TrackerError;
use crate::snapshot::Category;

/// Maximum assumed for a numeric stat with no configured maximum.
pub const DEFAULT_STAT_MAX: f64 = 100.0;

/// How numeric player stats are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// `value/max`
    #[default]
    Number,
    /// `value%`, the maximum is implicitly 100.
    Percentage,
}

/// Per-field display and persistence flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPolicy {
    pub enabled: bool,
    pub persist_in_history: bool,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            persist_in_history: false,
        }
    }
}

/// A numeric stat the player tracker follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomStat {
    pub id: String,
    pub name: String,
    pub max_value: Option<f64>,
    #[serde(flatten)]
    pub policy: FieldPolicy,
}

impl CustomStat {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// An operator-defined field the model is asked to fill in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomField {
    pub key: String,
    /// Example value or hint shown in the instruction block.
    pub description: String,
}

impl CustomField {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatsConfig {
    pub enabled: bool,
    pub display_mode: DisplayMode,
    pub custom_stats: Vec<CustomStat>,
    /// Policies for `status`, `skills`, `inventory` and `quests`.
    pub fields: BTreeMap<String, FieldPolicy>,
}

impl Default for PlayerStatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_mode: DisplayMode::Number,
            custom_stats: vec![
                CustomStat::new("health", "Health"),
                CustomStat::new("energy", "Energy"),
            ],
            fields: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneInfoConfig {
    pub enabled: bool,
    pub custom_fields: Vec<CustomField>,
    pub fields: BTreeMap<String, FieldPolicy>,
}

impl Default for SceneInfoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_fields: Vec::new(),
            fields: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterRosterConfig {
    pub enabled: bool,
    pub detail_fields: Vec<CustomField>,
    /// Policies for `relationship`, `thoughts`, `stats` and detail keys.
    pub fields: BTreeMap<String, FieldPolicy>,
}

impl Default for CharacterRosterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detail_fields: vec![
                CustomField::new("appearance", "Brief physical description"),
                CustomField::new("demeanor", "Current body language"),
            ],
            fields: BTreeMap::new(),
        }
    }
}

/// Complete tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    pub player_stats: PlayerStatsConfig,
    pub scene_info: SceneInfoConfig,
    pub character_roster: CharacterRosterConfig,
    pub history: HistoryConfig,
}

impl TrackerConfig {
    /// Load configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, TrackerError> {
        toml::from_str(text).map_err(|e| TrackerError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(text).map_err(|e| TrackerError::InvalidConfig(e.to_string()))
    }

    /// Whether a category is active at all.
    pub fn category_enabled(&self, category: Category) -> bool {
        match category {
            Category::PlayerStats => self.player_stats.enabled,
            Category::SceneInfo => self.scene_info.enabled,
            Category::CharacterRoster => self.character_roster.enabled,
        }
    }

    /// Enabled categories in their fixed order.
    pub fn enabled_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.category_enabled(*c))
            .collect()
    }

    /// Policy for one field of a category.
    ///
    /// Player stat ids are looked up among the custom stats first. A missing
    /// entry yields the default policy.
    pub fn field_policy(&self, category: Category, field: &str) -> FieldPolicy {
        let fields = match category {
            Category::PlayerStats => {
                if let Some(stat) = self.custom_stat(field) {
                    return stat.policy;
                }
                &self.player_stats.fields
            }
            Category::SceneInfo => &self.scene_info.fields,
            Category::CharacterRoster => &self.character_roster.fields,
        };
        fields.get(field).copied().unwrap_or_default()
    }

    /// Configured custom stat by id.
    pub fn custom_stat(&self, id: &str) -> Option<&CustomStat> {
        self.player_stats.custom_stats.iter().find(|s| s.id == id)
    }

    /// Configured maximum for a stat.
    pub fn stat_max(&self, id: &str) -> Result<f64, TrackerError> {
        self.custom_stat(id)
            .and_then(|s| s.max_value)
            .ok_or_else(|| TrackerError::MissingConfig(format!("playerStats.customStats[{}].maxValue", id)))
    }
}
