//! Checkpoint list for the save/load screen

use crate::persistence::SlotId;
use crate::state::{GameData, GameDataManager, StateError};

/// What clicking a slot does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotListMode {
    Save,
    #[default]
    Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub checkpoint: u32,
    pub label: String,
}

impl SlotEntry {
    fn new(checkpoint: u32, data: Option<&GameData>) -> Self {
        let label = match data {
            Some(data) => format!(
                "Checkpoint {checkpoint}: {}, Level: {}, Score: {}",
                data.player_name, data.player_level, data.player_score
            ),
            None => format!("Checkpoint {checkpoint}: (unreadable)"),
        };
        Self { checkpoint, label }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveSlotList {
    pub mode: SlotListMode,
    entries: Vec<SlotEntry>,
}

impl SaveSlotList {
    pub fn new(mode: SlotListMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// Entries in ascending checkpoint order
    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    /// Rescan the save directory
    pub fn refresh(&mut self, manager: &GameDataManager) -> Result<(), StateError> {
        let store = manager.store();
        self.entries = manager
            .list_slots()?
            .into_iter()
            .map(|n| match store.load(SlotId::Checkpoint(n)) {
                Ok(data) => SlotEntry::new(n, data.as_ref()),
                Err(err) => {
                    log::warn!("Skipping details of checkpoint {n}: {err}");
                    SlotEntry::new(n, None)
                }
            })
            .collect();
        Ok(())
    }

    /// Save to or load from `checkpoint`, depending on the mode
    pub fn activate(&mut self, manager: &mut GameDataManager, checkpoint: u32) -> Result<bool, StateError> {
        let done = match self.mode {
            SlotListMode::Save => {
                manager.save_game(checkpoint)?;
                true
            }
            SlotListMode::Load => manager.load_game(checkpoint)?,
        };
        self.refresh(manager)?;
        Ok(done)
    }

    pub fn delete(&mut self, manager: &mut GameDataManager, checkpoint: u32) -> Result<bool, StateError> {
        let deleted = manager.delete_slot(checkpoint)?;
        self.refresh(manager)?;
        Ok(deleted)
    }

    /// Save into a brand new checkpoint. Returns its number.
    pub fn create_new_save(&mut self, manager: &mut GameDataManager) -> Result<u32, StateError> {
        let checkpoint = manager.next_checkpoint();
        manager.save_game(checkpoint)?;
        self.refresh(manager)?;
        Ok(checkpoint)
    }
}
