//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool registration, then slot index)
//! - No rendering or platform dependencies

pub mod camera;
pub mod contact;
pub mod object;
pub mod player;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use camera::Camera2D;
pub use contact::{Contact, detect_contact};
pub use object::{Body, EnemyState, EntityPool, GameObject, Handle, IndicatorState, PoolObjectType};
pub use player::Player;
pub use session::{GameSession, SessionError};
pub use spawner::EnemySpawner;
pub use state::{Action, GameEvent, GamePhase, Owner, Scheduler, World};
pub use tick::{TickInput, late_update, tick};
