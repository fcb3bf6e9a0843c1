//! The orbiting player

use glam::Vec2;

use crate::tuning::PlayerTuning;
use crate::{normalize_angle, polar_to_cartesian};

/// The player, locked to a circle around the core
#[derive(Debug, Clone)]
pub struct Player {
    /// Current angle around the core (radians)
    pub theta: f32,
    /// Orbit radius
    pub radius: f32,
    /// Max angular speed (radians per second)
    pub max_speed: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            theta: 0.0,
            radius: tuning.orbit_radius,
            max_speed: tuning.rotation_speed.to_radians(),
        }
    }

    /// Back to the start position: right of the core, facing outward
    pub fn reset(&mut self) {
        self.theta = 0.0;
    }

    pub fn position(&self) -> Vec2 {
        polar_to_cartesian(self.radius, self.theta)
    }

    /// Facing outward from the core
    pub fn rotation(&self) -> f32 {
        normalize_angle(self.theta - std::f32::consts::FRAC_PI_2)
    }

    /// Move along the orbit toward `target_theta`, taking the short way round
    pub fn move_toward(&mut self, target_theta: f32, dt: f32) {
        let target = normalize_angle(target_theta);
        let current = normalize_angle(self.theta);

        let mut delta = target - current;
        // Handle wraparound
        if delta > std::f32::consts::PI {
            delta -= std::f32::consts::TAU;
        } else if delta < -std::f32::consts::PI {
            delta += std::f32::consts::TAU;
        }

        let max_delta = self.max_speed * dt;
        self.theta = normalize_angle(self.theta + delta.clamp(-max_delta, max_delta));
    }
}
