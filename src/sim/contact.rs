//! Contact tests between enemies and the things they can hit
//!
//! The host's physics would normally raise these as tagged trigger events;
//! headless runs use plain circle overlap instead.

use glam::Vec2;

use crate::consts::*;

/// What an enemy touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Intercepted by the player
    Player,
    /// Reached the core
    Core,
}

#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance_squared(b) <= (a_radius + b_radius) * (a_radius + b_radius)
}

/// Whether a circle at `pos` has reached the core
#[inline]
pub fn core_contact(pos: Vec2, radius: f32) -> bool {
    pos.length() - radius <= CORE_RADIUS
}

/// Contact for an enemy at `enemy_pos`. The player wins when both apply.
pub fn detect_contact(enemy_pos: Vec2, player_pos: Vec2) -> Option<Contact> {
    if circles_overlap(enemy_pos, ENEMY_RADIUS, player_pos, PLAYER_RADIUS) {
        Some(Contact::Player)
    } else if core_contact(enemy_pos, ENEMY_RADIUS) {
        Some(Contact::Core)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_contact_far_out() {
        assert_eq!(detect_contact(Vec2::new(10.0, 0.0), Vec2::new(2.0, 0.0)), None);
    }

    #[test]
    fn test_player_intercepts() {
        assert_eq!(
            detect_contact(Vec2::new(2.5, 0.0), Vec2::new(2.0, 0.0)),
            Some(Contact::Player)
        );
    }

    #[test]
    fn test_core_reached() {
        assert_eq!(
            detect_contact(Vec2::new(0.0, 0.7), Vec2::new(2.0, 0.0)),
            Some(Contact::Core)
        );
    }

    #[test]
    fn test_circles_touching() {
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.1, 0.0), 1.0));
    }
}
