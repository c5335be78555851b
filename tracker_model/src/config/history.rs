//! Historical context settings.

use serde::{Deserialize, Serialize};

/// Where historical context is appended in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionAnchor {
    /// End of the model turn the snapshot belongs to.
    #[default]
    AssistantTurnEnd,
    /// End of the nearest user turn before it.
    UserTurnEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    pub anchor: InjectionAnchor,

    /// Include every enabled field instead of only persisted ones.
    pub include_all_enabled: bool,

    /// First line of every injected block.
    pub preamble: String,

    /// Number of most recent turns scanned.
    pub window_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            anchor: InjectionAnchor::AssistantTurnEnd,
            include_all_enabled: false,
            preamble: "[Tracker state at this point in the story]".to_string(),
            window_size: 10,
        }
    }
}
