//! Slot files on disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::config::SaveConfig;
use crate::state::GameData;

const FILE_PREFIX: &str = "GameData";
const CHECKPOINT_PREFIX: &str = "GameData_checkpoint_";
const EXTENSION: &str = ".json";

/// A durable storage location for one game data record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// `GameData_AutoSave.json`
    AutoSave,
    /// `GameData_checkpoint_<n>.json`
    Checkpoint(u32),
}

impl SlotId {
    pub fn file_name(&self) -> String {
        match self {
            SlotId::AutoSave => format!("{FILE_PREFIX}_AutoSave{EXTENSION}"),
            SlotId::Checkpoint(n) => format!("{CHECKPOINT_PREFIX}{n}{EXTENSION}"),
        }
    }

    /// Parse a checkpoint file name. Anything else is `None`.
    ///
    /// Only the exact name [`file_name`](Self::file_name) produces is accepted,
    /// so `_007` or `_+7` never shadow a real slot.
    pub fn parse_checkpoint(file_name: &str) -> Option<u32> {
        let n: u32 = file_name
            .strip_prefix(CHECKPOINT_PREFIX)?
            .strip_suffix(EXTENSION)?
            .parse()
            .ok()?;
        (SlotId::Checkpoint(n).file_name() == file_name).then_some(n)
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed save file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize game data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SaveError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        SaveError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes slot files in one save directory
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &SaveConfig) -> Self {
        Self::new(config.resolve_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: SlotId) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    pub fn exists(&self, slot: SlotId) -> bool {
        self.path_for(slot).is_file()
    }

    /// Write `data` to `slot`, replacing any previous file atomically
    pub fn save(&self, slot: SlotId, data: &GameData) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(&self.dir).map_err(|e| SaveError::io("create", &self.dir, e))?;

        let path = self.path_for(slot);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(data)?;

        fs::write(&tmp, json).map_err(|e| SaveError::io("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| SaveError::io("replace", &path, e))?;

        log::info!("Game data saved to {}", path.display());
        Ok(path)
    }

    /// Read `slot`. A missing file is `Ok(None)`: there simply is no prior save.
    pub fn load(&self, slot: SlotId) -> Result<Option<GameData>, SaveError> {
        let path = self.path_for(slot);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SaveError::io("read", &path, err)),
        };

        let data = serde_json::from_str(&json).map_err(|source| SaveError::Malformed {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded game data from {}", path.display());
        Ok(Some(data))
    }

    /// Delete `slot`. Returns false if there was nothing to delete.
    pub fn delete(&self, slot: SlotId) -> Result<bool, SaveError> {
        let path = self.path_for(slot);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted save file {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("No save file to delete at {}", path.display());
                Ok(false)
            }
            Err(err) => Err(SaveError::io("delete", &path, err)),
        }
    }

    /// Checkpoint numbers present on disk, ascending.
    ///
    /// Files that don't follow the checkpoint naming are ignored.
    pub fn list_checkpoints(&self) -> Result<Vec<u32>, SaveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(SaveError::io("scan", &self.dir, err)),
        };

        let mut checkpoints: Vec<u32> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| SlotId::parse_checkpoint(entry.file_name().to_str()?))
            .collect();
        checkpoints.sort_unstable();
        checkpoints.dedup();
        Ok(checkpoints)
    }
}
