//! Persistent game state
//!
//! One live [`GameData`] record, owned by [`GameDataManager`]:
//! - Mutation only through [`GameDataManager::modify`]
//! - Synchronous change notification to observers, in registration order
//! - Write-through auto-save as one of those observers, or explicit
//!   checkpoint save/load

mod autosave;
mod data;
mod manager;

pub use autosave::AutoSaveObserver;
pub use data::{DEFAULT_LIVES, GameData};
pub use manager::{GameDataManager, Observer, Reentry, SlotEvent, StateError, SubscriptionId};
