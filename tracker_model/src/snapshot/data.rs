//! Normalized category data.
//!
//! Both structured schema generations normalize into these types. Every
//! leaf is a [`FieldValue`], so lock wrappers survive normalization and are
//! only stripped when a value is resolved for display.

use crate::value::FieldValue;

/// A single numeric player stat.
#[derive(Debug, Clone, PartialEq)]
pub struct StatEntry {
    pub id: String,
    pub name: String,
    pub value: FieldValue,
}

/// Player skills, either plain names or named levels.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Skills {
    #[default]
    None,
    Names(Vec<FieldValue>),
    Levels(Vec<(String, FieldValue)>),
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        match self {
            Skills::None => true,
            Skills::Names(names) => names.is_empty(),
            Skills::Levels(levels) => levels.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    pub on_person: FieldValue,
    pub clothing: FieldValue,
    /// Storage location -> items kept there.
    pub stored: Vec<(String, FieldValue)>,
    pub assets: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quests {
    pub main: FieldValue,
    pub optional: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerStats {
    pub stats: Vec<StatEntry>,
    pub status: FieldValue,
    pub skills: Skills,
    pub inventory: Inventory,
    pub quests: Quests,
}

/// Scene fields in payload order, fixed and custom alike.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneInfo {
    pub fields: Vec<(String, FieldValue)>,
}

impl SceneInfo {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// One character present in the scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Character {
    pub name: FieldValue,
    pub details: Vec<(String, FieldValue)>,
    pub relationship: FieldValue,
    pub thoughts: FieldValue,
    pub stats: Vec<(String, FieldValue)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacterRoster {
    pub characters: Vec<Character>,
}

/// Normalized structured data for one category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryData {
    PlayerStats(PlayerStats),
    SceneInfo(SceneInfo),
    CharacterRoster(CharacterRoster),
}
