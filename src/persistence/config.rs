//! Where and how game data is saved

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which save layout the game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SaveMode {
    /// A single slot, rewritten after every change
    AutoSave,
    /// Numbered slots, saved and loaded explicitly
    #[default]
    Checkpoints,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::AutoSave => "autoSave",
            SaveMode::Checkpoints => "checkpoints",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "autosave" | "auto" => Some(SaveMode::AutoSave),
            "checkpoints" | "checkpoint" | "slots" => Some(SaveMode::Checkpoints),
            _ => None,
        }
    }
}

/// Save settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveConfig {
    pub mode: SaveMode,
    /// Explicit save directory (overrides the environment and platform default)
    pub dir: Option<PathBuf>,
}

impl SaveConfig {
    /// Environment variable that overrides the platform save directory
    pub const DIR_ENV: &'static str = "ORBIT_GUARD_SAVE_DIR";

    const APP_DIR: &'static str = "orbit-guard";
    const SAVE_DIR: &'static str = "Saves";

    /// Resolve the save directory: explicit path, then `ORBIT_GUARD_SAVE_DIR`,
    /// then `<local data dir>/orbit-guard/Saves`.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os(Self::DIR_ENV) {
            return PathBuf::from(dir);
        }
        match dirs::data_local_dir() {
            Some(base) => base.join(Self::APP_DIR).join(Self::SAVE_DIR),
            None => {
                log::warn!("No local data directory, saving next to the executable");
                PathBuf::from(Self::SAVE_DIR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let config = SaveConfig {
            mode: SaveMode::AutoSave,
            dir: Some(PathBuf::from("/tmp/orbit-saves")),
        };
        assert_eq!(config.resolve_dir(), PathBuf::from("/tmp/orbit-saves"));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(SaveMode::from_str("AutoSave"), Some(SaveMode::AutoSave));
        assert_eq!(SaveMode::from_str("slots"), Some(SaveMode::Checkpoints));
        assert_eq!(SaveMode::from_str("cloud"), None);
        assert_eq!(SaveMode::from_str(SaveMode::Checkpoints.as_str()), Some(SaveMode::Checkpoints));
    }

    #[test]
    fn test_mode_json_names() {
        let config: SaveConfig = serde_json::from_str(r#"{"mode": "autoSave"}"#).unwrap();
        assert_eq!(config.mode, SaveMode::AutoSave);
        assert!(config.dir.is_none());
    }
}
