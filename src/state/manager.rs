//! Owner of the live game data record

use thiserror::Error;

use super::GameData;
use super::autosave::AutoSaveObserver;
use crate::persistence::{SaveConfig, SaveError, SaveMode, SaveStore, SlotId};

/// Called with the whole record after every change
pub type Observer = Box<dyn FnMut(&GameData, &mut Reentry)>;

type SlotObserver = Box<dyn FnMut(SlotEvent)>;
type Mutation = Box<dyn FnOnce(&mut GameData)>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("game data has not been initialized")]
    NotInitialized,
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Checkpoint save/load notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    Saved(u32),
    Loaded(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Lets an observer ask for a follow-up change while it is being notified.
///
/// Requests are applied after the current notification pass, each with its
/// own notification. Only one level deep: changes requested while handling a
/// follow-up are dropped.
pub struct Reentry {
    requests: Vec<Mutation>,
    accepting: bool,
}

impl Reentry {
    fn open() -> Self {
        Self {
            requests: Vec::new(),
            accepting: true,
        }
    }

    fn closed() -> Self {
        Self {
            requests: Vec::new(),
            accepting: false,
        }
    }

    /// Queue a change to apply once every observer has seen the current one
    pub fn modify<F>(&mut self, mutation: F)
    where
        F: FnOnce(&mut GameData) + 'static,
    {
        if !self.accepting {
            log::error!("Nested game data change requested from a follow-up notification, dropped");
            return;
        }
        self.requests.push(Box::new(mutation));
    }
}

/// Single source of truth for persistent progress.
///
/// States: uninitialized until [`init`](Self::init) or
/// [`create_new_game`](Self::create_new_game), then loaded/created, then
/// mutated any number of times.
pub struct GameDataManager {
    data: Option<GameData>,
    observers: Vec<(SubscriptionId, Observer)>,
    slot_observers: Vec<SlotObserver>,
    store: SaveStore,
    mode: SaveMode,
    /// Checkpoint last saved to or loaded from
    active_checkpoint: Option<u32>,
    next_subscription: u64,
}

impl GameDataManager {
    /// In auto-save mode the write-through observer is subscribed first.
    pub fn new(store: SaveStore, mode: SaveMode) -> Self {
        let mut manager = Self {
            data: None,
            observers: Vec::new(),
            slot_observers: Vec::new(),
            store: store.clone(),
            mode,
            active_checkpoint: None,
            next_subscription: 0,
        };
        if mode == SaveMode::AutoSave {
            manager.add_observer(AutoSaveObserver::new(store).into_observer());
        }
        manager
    }

    pub fn from_config(config: &SaveConfig) -> Self {
        Self::new(SaveStore::from_config(config), config.mode)
    }

    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// The live record, if initialized. Change it through [`modify`](Self::modify).
    pub fn data(&self) -> Option<&GameData> {
        self.data.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    pub fn active_checkpoint(&self) -> Option<u32> {
        self.active_checkpoint
    }

    /// Observe every change. Observers run in subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&GameData, &mut Reentry) + 'static,
    {
        self.add_observer(Box::new(observer))
    }

    fn add_observer(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Observe checkpoint saves and loads
    pub fn on_slot_event<F>(&mut self, observer: F)
    where
        F: FnMut(SlotEvent) + 'static,
    {
        self.slot_observers.push(Box::new(observer));
    }

    /// Load the configured slot, or start fresh if there is none.
    ///
    /// Auto-save mode reads the auto-save slot; checkpoint mode reads the
    /// highest-numbered checkpoint. Fires one change notification.
    pub fn init(&mut self) {
        if self.data.is_some() {
            log::warn!("Game data already initialized");
            return;
        }

        let loaded = match self.mode {
            SaveMode::AutoSave => self.store.load(SlotId::AutoSave),
            SaveMode::Checkpoints => self.load_latest_checkpoint(),
        };

        let data = match loaded {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::info!("No saved game found, creating new game data");
                GameData::default()
            }
            Err(err) => {
                log::warn!("Could not load saved game ({err}), creating new game data");
                self.active_checkpoint = None;
                GameData::default()
            }
        };

        self.data = Some(data);
        self.notify();
    }

    fn load_latest_checkpoint(&mut self) -> Result<Option<GameData>, SaveError> {
        let Some(&latest) = self.store.list_checkpoints()?.last() else {
            return Ok(None);
        };
        let data = self.store.load(SlotId::Checkpoint(latest))?;
        if data.is_some() {
            self.active_checkpoint = Some(latest);
        }
        Ok(data)
    }

    /// Apply `mutation` to the live record, then notify observers once
    pub fn modify<F>(&mut self, mutation: F) -> Result<(), StateError>
    where
        F: FnOnce(&mut GameData),
    {
        let Some(data) = self.data.as_mut() else {
            log::error!("Game data modified before initialization, ignoring");
            return Err(StateError::NotInitialized);
        };
        mutation(data);
        self.notify();
        Ok(())
    }

    /// Replace the record with fresh defaults.
    ///
    /// In auto-save mode the auto-save file is deleted first.
    pub fn create_new_game(&mut self) {
        if self.mode == SaveMode::AutoSave {
            if let Err(err) = self.store.delete(SlotId::AutoSave) {
                log::error!("Could not delete auto-save: {err}");
            }
        }
        self.active_checkpoint = None;
        self.data = Some(GameData::default());
        self.notify();
    }

    /// Write the live record to checkpoint `n`
    pub fn save_game(&mut self, checkpoint: u32) -> Result<(), StateError> {
        let data = self.data.as_ref().ok_or_else(|| {
            log::error!("Cannot save checkpoint {checkpoint}: game data not initialized");
            StateError::NotInitialized
        })?;
        self.store.save(SlotId::Checkpoint(checkpoint), data)?;
        self.active_checkpoint = Some(checkpoint);
        self.emit(SlotEvent::Saved(checkpoint));
        Ok(())
    }

    /// Replace the live record with checkpoint `n`. Returns false if no such save exists.
    pub fn load_game(&mut self, checkpoint: u32) -> Result<bool, StateError> {
        let Some(data) = self.store.load(SlotId::Checkpoint(checkpoint))? else {
            log::warn!("No save file for checkpoint {checkpoint}");
            return Ok(false);
        };
        self.data = Some(data);
        self.active_checkpoint = Some(checkpoint);
        self.notify();
        self.emit(SlotEvent::Loaded(checkpoint));
        Ok(true)
    }

    /// Checkpoints on disk, ascending
    pub fn list_slots(&self) -> Result<Vec<u32>, StateError> {
        Ok(self.store.list_checkpoints()?)
    }

    /// Delete checkpoint `n`. Returns false if it didn't exist.
    pub fn delete_slot(&mut self, checkpoint: u32) -> Result<bool, StateError> {
        let deleted = self.store.delete(SlotId::Checkpoint(checkpoint))?;
        if self.active_checkpoint == Some(checkpoint) {
            self.active_checkpoint = None;
        }
        Ok(deleted)
    }

    /// Checkpoint number a new save would use: one past the highest on disk
    pub fn next_checkpoint(&self) -> u32 {
        match self.store.list_checkpoints() {
            Ok(slots) => slots.last().map_or(1, |n| n.saturating_add(1)),
            Err(err) => {
                log::warn!("Could not scan checkpoints ({err}), using slot 1");
                1
            }
        }
    }

    /// Persist the live record now, whatever happened before.
    ///
    /// Writes the auto-save slot, or in checkpoint mode the active checkpoint
    /// (a new one if none is active). Meant for shutdown hooks.
    pub fn force_save(&mut self) -> Result<SlotId, StateError> {
        match self.mode {
            SaveMode::AutoSave => {
                let data = self.data.as_ref().ok_or(StateError::NotInitialized)?;
                self.store.save(SlotId::AutoSave, data)?;
                Ok(SlotId::AutoSave)
            }
            SaveMode::Checkpoints => {
                let checkpoint = self.active_checkpoint.unwrap_or_else(|| self.next_checkpoint());
                self.save_game(checkpoint)?;
                Ok(SlotId::Checkpoint(checkpoint))
            }
        }
    }

    /// Deliver the record to every observer, then run queued follow-up changes
    fn notify(&mut self) {
        let mut reentry = Reentry::open();
        self.dispatch(&mut reentry);

        for mutation in reentry.requests {
            let Some(data) = self.data.as_mut() else {
                return;
            };
            mutation(data);
            self.dispatch(&mut Reentry::closed());
        }
    }

    fn dispatch(&mut self, reentry: &mut Reentry) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        for (_, observer) in &mut self.observers {
            observer(data, reentry);
        }
    }

    fn emit(&mut self, event: SlotEvent) {
        for observer in &mut self.slot_observers {
            observer(event);
        }
    }
}
