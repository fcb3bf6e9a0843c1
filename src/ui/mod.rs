//! View models for the HUD and the save/load screen
//!
//! Nothing here draws; each type turns game data into the strings and flags a
//! frontend renders.

mod hud;
mod save_slots;

pub use hud::Hud;
pub use save_slots::{SaveSlotList, SlotEntry, SlotListMode};
