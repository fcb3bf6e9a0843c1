//! Write-through persistence observer

use super::GameData;
use super::manager::{Observer, Reentry};
use crate::persistence::{SaveStore, SlotId};

/// Flushes every change of the game data to the auto-save slot
#[derive(Debug, Clone)]
pub struct AutoSaveObserver {
    store: SaveStore,
}

impl AutoSaveObserver {
    pub fn new(store: SaveStore) -> Self {
        Self { store }
    }

    /// Write `data` now. Failures are logged; the live record stays authoritative.
    pub fn write(&self, data: &GameData) {
        if let Err(err) = self.store.save(SlotId::AutoSave, data) {
            log::error!("Auto-save failed: {err}");
        }
    }

    pub fn into_observer(self) -> Observer {
        Box::new(move |data: &GameData, _: &mut Reentry| self.write(data))
    }
}
