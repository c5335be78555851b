//! Transcript turns and the bounded history window.

use serde::{Deserialize, Serialize};

use crate::snapshot::TrackerSnapshot;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    User,
    Model,
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub author_role: AuthorRole,
    pub text: String,

    /// Tracker state recorded when this turn was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_snapshot: Option<TrackerSnapshot>,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author_role: AuthorRole::User,
            text: text.into(),
            attached_snapshot: None,
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            author_role: AuthorRole::Model,
            text: text.into(),
            attached_snapshot: None,
        }
    }

    /// Attach a tracker snapshot.
    pub fn with_snapshot(mut self, snapshot: TrackerSnapshot) -> Self {
        self.attached_snapshot = Some(snapshot);
        self
    }

    pub fn is_user(&self) -> bool {
        self.author_role == AuthorRole::User
    }

    pub fn is_model(&self) -> bool {
        self.author_role == AuthorRole::Model
    }
}

/// The most recent `size` turns, with the index of the first one in `turns`.
pub fn recent_window(turns: &[Turn], size: usize) -> (usize, &[Turn]) {
    let offset = turns.len().saturating_sub(size);
    (offset, &turns[offset..])
}
