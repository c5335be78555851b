//! Injection map - text to append to transcript turns, keyed by turn index.

use tracing::debug;
use tracker_model::Turn;

/// Separator between contributions at the same index, and between a turn's
/// own text and the injected text.
const SEPARATOR: &str = "\n\n";

/// Accumulated historical context per turn index.
///
/// Indices keep their first-insertion order. Appending to an existing index
/// concatenates, it never overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionMap {
    entries: Vec<(usize, String)>,
}

impl InjectionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text at a turn index.
    pub fn append(&mut self, index: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        match self.entries.iter_mut().find(|(i, _)| *i == index) {
            Some((_, existing)) => {
                existing.push_str(SEPARATOR);
                existing.push_str(text);
            }
            None => self.entries.push((index, text.to_string())),
        }
    }

    /// Text accumulated at an index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, text)| text.as_str())
    }

    /// Whether anything was mapped to an index.
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(i, text)| (*i, text.as_str()))
    }

    /// Mapped indices in insertion order.
    pub fn indices(&self) -> Vec<usize> {
        self.entries.iter().map(|(i, _)| *i).collect()
    }

    /// Append mapped text to the turns it targets.
    ///
    /// `offset` is the position of index 0 within `turns`, for maps built over
    /// a window of a longer transcript.
    pub fn apply_to(&self, turns: &mut [Turn], offset: usize) {
        for (index, text) in self.iter() {
            match turns.get_mut(offset + index) {
                Some(turn) => {
                    turn.text.push_str(SEPARATOR);
                    turn.text.push_str(text);
                }
                None => debug!(index, offset, "injection target outside transcript"),
            }
        }
    }
}
