//! Top-ten table of finished runs, stored as a JSON list.

use crate::character::class::CharacterClass;
use crate::character::model::{Character, ResourceMap};
use crate::core::constants::MAX_HIGHSCORES;
use crate::error::PersistError;
use crate::items::types::EquipmentSlot;
use crate::utils::persistence::{load_json_or_default, save_json};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub copper: u64,
    pub bosses_defeated: u32,
    #[serde(default)]
    pub rebirths: u32,
    #[serde(default)]
    pub resources: ResourceMap,
    #[serde(default)]
    pub cheat_activated: bool,
    pub weapon: Option<String>,
    pub head: Option<String>,
    pub chest: Option<String>,
    #[serde(default)]
    pub recorded_at: i64,
}

impl HighscoreEntry {
    pub fn from_character(character: &Character) -> Self {
        Self {
            name: character.name.clone(),
            class: character.class,
            level: character.level,
            copper: character.copper,
            bosses_defeated: character.bosses_defeated,
            rebirths: character.rebirths,
            resources: character.resources.clone(),
            cheat_activated: character.cheat_activated,
            weapon: character.equipped_name(EquipmentSlot::Weapon),
            head: character.equipped_name(EquipmentSlot::Head),
            chest: character.equipped_name(EquipmentSlot::Chest),
            recorded_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighscoreTable {
    entries: Vec<HighscoreEntry>,
}

impl HighscoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the table, falling back to an empty one if the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        let mut table: Self = load_json_or_default(path);
        table.normalize();
        table
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        save_json(path, self)
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    /// Adds an entry and returns its 1-based rank, or None if it did not make
    /// the table. Ties keep the earlier entry ahead.
    pub fn insert(&mut self, entry: HighscoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|e| e.level < entry.level)
            .unwrap_or(self.entries.len());
        if position >= MAX_HIGHSCORES {
            return None;
        }
        self.entries.insert(position, entry);
        self.entries.truncate(MAX_HIGHSCORES);
        Some(position + 1)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.level.cmp(&a.level));
        self.entries.truncate(MAX_HIGHSCORES);
    }
}
