//! Orbit Guard - defend the core from incoming enemies
//!
//! Core modules:
//! - `pool`: Keyed object pool with FIFO reuse
//! - `state`: Game data record, change observers and the manager that owns them
//! - `persistence`: Save slots as JSON files
//! - `sched`: Cooperative timer queue for delayed and repeating work
//! - `sim`: Deterministic simulation (spawning, movement, contacts)
//! - `ui`: HUD and save slot view models
//! - `tuning`: Data-driven game balance

pub mod persistence;
pub mod pool;
pub mod sched;
pub mod sim;
pub mod state;
pub mod tuning;
pub mod ui;

pub use pool::ObjectPool;
pub use state::{GameData, GameDataManager};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Collision radii, world units
    pub const CORE_RADIUS: f32 = 0.5;
    pub const PLAYER_RADIUS: f32 = 0.4;
    pub const ENEMY_RADIUS: f32 = 0.3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
