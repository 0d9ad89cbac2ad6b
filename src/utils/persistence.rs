//! JSON file helpers for the ~/.chronicle/ data directory.

use crate::error::PersistError;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the ~/.chronicle/ directory path, creating it if needed.
pub fn chronicle_dir() -> Result<PathBuf, PersistError> {
    let home_dir = dirs::home_dir().ok_or(PersistError::NoHomeDir)?;
    let dir = home_dir.join(".chronicle");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}
