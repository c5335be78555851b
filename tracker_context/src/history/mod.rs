//! Historical Context Mapper - positions past tracker state inside the
//! transcript.
//!
//! The mapping works as follows:
//! 1. **Exclude**: the last model turn in the window is the current turn and
//!    is never mapped
//! 2. **Collect**: every other model turn contributes its attached snapshot
//! 3. **Filter**: only persisted fields survive (see [`filter_payload`])
//! 4. **Format**: the filtered snapshot is summarized under a preamble line
//! 5. **Target**: the anchor picks the turn the text is appended to
//! 6. **Accumulate**: contributions append in forward scan order

mod filter;
mod injection;

pub use filter::*;
pub use injection::*;

use tracing::debug;
use tracker_model::{recent_window, InjectionAnchor, TrackerConfig, TrackerSnapshot, Turn};

use crate::formatter::ContextFormatter;

/// Builds injection maps from a transcript window.
pub struct HistoryMapper<'a> {
    config: &'a TrackerConfig,
    display_name: &'a str,
}

impl<'a> HistoryMapper<'a> {
    pub fn new(config: &'a TrackerConfig, display_name: &'a str) -> Self {
        Self { config, display_name }
    }

    /// Map window indices to the historical context appended there.
    ///
    /// Pure and deterministic: the same window and configuration always
    /// produce the same map.
    pub fn build_injection_map(&self, window: &[Turn]) -> InjectionMap {
        let history = &self.config.history;
        let mut map = InjectionMap::new();

        let Some(current) = window.iter().rposition(Turn::is_model) else {
            return map;
        };

        for (index, turn) in window.iter().enumerate() {
            if !turn.is_model() || index == current {
                continue;
            }

            let Some(snapshot) = &turn.attached_snapshot else {
                debug!(index, "model turn has no tracker snapshot");
                continue;
            };

            let summary = self.summarize(snapshot);
            if summary.is_empty() {
                continue;
            }

            let target = match history.anchor {
                InjectionAnchor::AssistantTurnEnd => index,
                InjectionAnchor::UserTurnEnd => match window[..index].iter().rposition(Turn::is_user) {
                    Some(user_index) => user_index,
                    None => {
                        debug!(index, "no user turn precedes this snapshot, skipping");
                        continue;
                    }
                },
            };

            map.append(target, self.with_preamble(summary));
        }

        map
    }

    /// Window the transcript, map it, and append the mapped text in place.
    ///
    /// Returns the map, with indices relative to the window start.
    pub fn inject(&self, transcript: &mut [Turn]) -> InjectionMap {
        let (offset, window) = recent_window(transcript, self.config.history.window_size);
        let map = self.build_injection_map(window);
        map.apply_to(transcript, offset);
        map
    }

    /// Format the persisted part of one snapshot.
    pub fn summarize(&self, snapshot: &TrackerSnapshot) -> String {
        let include_all = self.config.history.include_all_enabled;
        let filtered: Vec<_> = self
            .config
            .enabled_categories()
            .into_iter()
            .map(|category| {
                let payload = filter_payload(snapshot.parse(category), category, self.config, include_all);
                (category, payload)
            })
            .collect();

        ContextFormatter::new(self.config).format_parsed(&filtered, self.display_name)
    }

    fn with_preamble(&self, summary: String) -> String {
        let preamble = self.config.history.preamble.trim();
        if preamble.is_empty() {
            summary
        } else {
            format!("{}\n{}", preamble, summary)
        }
    }
}
