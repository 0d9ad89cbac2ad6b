//! Character snapshots as checksummed JSON files in ~/.chronicle/saves/.
//!
//! Each file is an envelope `{version, saved_at, checksum, payload}` where
//! `checksum` is the SHA-256 of the compact JSON payload. Files written
//! before the envelope existed hold a bare character and are still read.

use crate::character::class::CharacterClass;
use crate::character::model::Character;
use crate::core::constants::SAVE_VERSION;
use crate::error::PersistError;
use crate::utils::persistence::chronicle_dir;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    saved_at: i64,
    checksum: String,
    payload: serde_json::Value,
}

/// One line of the character selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub filename: String,
    pub name: String,
    pub class: Option<CharacterClass>,
    pub level: u32,
    pub rebirths: u32,
    pub saved_at: i64,
    pub is_corrupted: bool,
}

fn checksum(payload: &serde_json::Value) -> Result<String, PersistError> {
    let bytes = serde_json::to_vec(payload)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Serializes a character into the envelope format.
pub fn encode(character: &Character) -> Result<String, PersistError> {
    let payload = serde_json::to_value(character)?;
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        saved_at: chrono::Utc::now().timestamp(),
        checksum: checksum(&payload)?,
        payload,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parses a snapshot, verifying its checksum and repairing the character.
pub fn decode(json: &str, source: &str) -> Result<(Character, i64), PersistError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let (mut character, saved_at) = if value.get("payload").is_some() {
        let envelope: SaveEnvelope = serde_json::from_value(value)?;
        if envelope.version > SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: envelope.version,
                supported: SAVE_VERSION,
            });
        }
        if checksum(&envelope.payload)? != envelope.checksum {
            return Err(PersistError::ChecksumMismatch(source.to_string()));
        }
        let character: Character = serde_json::from_value(envelope.payload)?;
        (character, envelope.saved_at)
    } else {
        let character: Character = serde_json::from_value(value)?;
        let saved_at = character.created_at;
        (character, saved_at)
    };
    character.repair();
    Ok((character, saved_at))
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if trimmed.chars().count() > 16 {
        return Err("Name must be 16 characters or less".to_string());
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        );
    }

    Ok(())
}

pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

pub struct CharacterStore {
    dir: PathBuf,
}

impl CharacterStore {
    /// Store rooted at ~/.chronicle/saves/.
    pub fn new() -> Result<Self, PersistError> {
        Self::with_dir(chronicle_dir()?.join("saves"))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for a character: its sanitized name, or its id when
    /// nothing of the name survives sanitizing.
    pub fn filename_for(character: &Character) -> String {
        let stem = sanitize_name(&character.name);
        if stem.is_empty() {
            format!("{}.json", character.id)
        } else {
            format!("{}.json", stem)
        }
    }

    pub fn save(&self, character: &Character) -> Result<PathBuf, PersistError> {
        let path = self.dir.join(Self::filename_for(character));
        fs::write(&path, encode(character)?)?;
        log::debug!("saved {} to {}", character.name, path.display());
        Ok(path)
    }

    /// Loads a character. Missing, corrupt or tampered files yield None.
    pub fn load(&self, filename: &str) -> Option<Character> {
        match self.try_load(filename) {
            Ok((character, _)) => Some(character),
            Err(PersistError::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("could not load {}: {}", filename, e);
                None
            }
        }
    }

    fn try_load(&self, filename: &str) -> Result<(Character, i64), PersistError> {
        let json = fs::read_to_string(self.dir.join(filename))?;
        decode(&json, filename)
    }

    /// Deletes a save. A file that is already gone is not an error.
    pub fn delete(&self, filename: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.dir.join(filename)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every save in the directory, most recently saved first. Unreadable
    /// files are listed as corrupted.
    pub fn list(&self) -> Result<Vec<SaveSummary>, PersistError> {
        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            let summary = match self.try_load(filename) {
                Ok((character, saved_at)) => SaveSummary {
                    filename: filename.to_string(),
                    name: character.name,
                    class: Some(character.class),
                    level: character.level,
                    rebirths: character.rebirths,
                    saved_at,
                    is_corrupted: false,
                },
                Err(e) => {
                    log::warn!("corrupt save {}: {}", filename, e);
                    SaveSummary {
                        filename: filename.to_string(),
                        name: "[CORRUPTED]".to_string(),
                        class: None,
                        level: 0,
                        rebirths: 0,
                        saved_at: 0,
                        is_corrupted: true,
                    }
                }
            };
            saves.push(summary);
        }

        saves.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(saves)
    }
}
