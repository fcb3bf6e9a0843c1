//! World-to-screen projection for screen-space indicators
//!
//! Viewport coordinates run 0..1 from the bottom-left corner; screen
//! coordinates are pixels from the same corner.

use glam::Vec2;

use crate::tuning::CameraTuning;

/// Viewport margin that counts as off-screen (indicators clamp inside it)
pub const VIEWPORT_MARGIN: f32 = 0.05;
/// Pixels an on-screen indicator floats above its enemy
pub const INDICATOR_OFFSET_Y: f32 = 30.0;

/// Orthographic 2D camera centered on the core
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub center: Vec2,
    /// World units visible vertically
    pub view_height: f32,
    /// Pixels
    pub screen_size: Vec2,
}

impl Camera2D {
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            center: Vec2::ZERO,
            view_height: tuning.view_height,
            screen_size: Vec2::new(tuning.screen_width, tuning.screen_height),
        }
    }

    /// World units visible horizontally and vertically
    pub fn view_size(&self) -> Vec2 {
        let aspect = self.screen_size.x / self.screen_size.y;
        Vec2::new(self.view_height * aspect, self.view_height)
    }

    pub fn world_to_viewport(&self, world: Vec2) -> Vec2 {
        (world - self.center) / self.view_size() + Vec2::splat(0.5)
    }

    pub fn viewport_to_screen(&self, viewport: Vec2) -> Vec2 {
        viewport * self.screen_size
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.viewport_to_screen(self.world_to_viewport(world))
    }

    /// Inside the viewport, excluding the margin band
    pub fn is_on_screen(&self, world: Vec2) -> bool {
        let vp = self.world_to_viewport(world);
        let lo = VIEWPORT_MARGIN;
        let hi = 1.0 - VIEWPORT_MARGIN;
        vp.x > lo && vp.x < hi && vp.y > lo && vp.y < hi
    }

    /// Where to draw the indicator for something at `world`: just above it
    /// when visible, otherwise pinned to the nearest point of the margin band.
    pub fn indicator_position(&self, world: Vec2) -> Vec2 {
        if self.is_on_screen(world) {
            self.world_to_screen(world) + Vec2::new(0.0, INDICATOR_OFFSET_Y)
        } else {
            let vp = self
                .world_to_viewport(world)
                .clamp(Vec2::splat(VIEWPORT_MARGIN), Vec2::splat(1.0 - VIEWPORT_MARGIN));
            self.viewport_to_screen(vp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera2D {
        Camera2D::new(&CameraTuning {
            screen_width: 1000.0,
            screen_height: 500.0,
            view_height: 10.0,
        })
    }

    #[test]
    fn test_core_is_screen_center() {
        let cam = camera();
        assert_eq!(cam.world_to_screen(Vec2::ZERO), Vec2::new(500.0, 250.0));
    }

    #[test]
    fn test_on_screen_indicator_floats_above() {
        let cam = camera();
        let pos = cam.indicator_position(Vec2::new(2.0, 1.0));
        let screen = cam.world_to_screen(Vec2::new(2.0, 1.0));
        assert_eq!(pos, screen + Vec2::new(0.0, INDICATOR_OFFSET_Y));
    }

    #[test]
    fn test_off_screen_indicator_is_clamped() {
        let cam = camera();
        // Far to the right, level with the core
        let pos = cam.indicator_position(Vec2::new(100.0, 0.0));
        assert!((pos.x - 950.0).abs() < 1e-3);
        assert!((pos.y - 250.0).abs() < 1e-3);
        assert!(!cam.is_on_screen(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_off_screen_corner() {
        let cam = camera();
        let pos = cam.indicator_position(Vec2::new(-100.0, -100.0));
        assert!((pos.x - 50.0).abs() < 1e-3);
        assert!((pos.y - 25.0).abs() < 1e-3);
    }
}
