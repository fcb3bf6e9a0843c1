//! Enemy spawning and difficulty ramp
//!
//! Two routines per spawner, both on the shared scheduler:
//! - spawn: every `spawn_rate` seconds, one enemy on the spawn ring
//! - ramp: every `difficulty_increase_interval` seconds, spawn faster and
//!   move faster, within bounds

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Action, Owner, Scheduler};
use crate::polar_to_cartesian;
use crate::tuning::SpawnerTuning;

#[derive(Debug, Clone)]
pub struct EnemySpawner {
    tuning: SpawnerTuning,
    spawn_rate: f32,
    enemy_speed: f32,
    rng: Pcg32,
}

impl EnemySpawner {
    pub fn new(tuning: SpawnerTuning, seed: u64) -> Self {
        Self {
            spawn_rate: tuning.initial_spawn_rate,
            enemy_speed: tuning.initial_enemy_speed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seconds until the next spawn
    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    /// Difficulty speed for newly spawned enemies
    pub fn enemy_speed(&self) -> f32 {
        self.enemy_speed
    }

    /// Speed added on top of a template's base speed
    pub fn speed_bonus(&self) -> f32 {
        self.enemy_speed - self.tuning.initial_enemy_speed
    }

    pub fn spawn_radius(&self) -> f32 {
        self.tuning.spawn_radius
    }

    /// Arm both routines
    pub fn start(&self, scheduler: &mut Scheduler) {
        self.schedule_spawn(scheduler);
        self.schedule_ramp(scheduler);
    }

    /// Abandon both routines. Returns how many pending steps were dropped.
    pub fn stop(&self, scheduler: &mut Scheduler) -> usize {
        scheduler.cancel_owner(Owner::Spawner)
    }

    /// Stop, restore the starting difficulty, start again
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        self.stop(scheduler);
        self.spawn_rate = self.tuning.initial_spawn_rate;
        self.enemy_speed = self.tuning.initial_enemy_speed;
        self.start(scheduler);
    }

    pub fn schedule_spawn(&self, scheduler: &mut Scheduler) {
        scheduler.schedule(Owner::Spawner, self.spawn_rate, Action::SpawnEnemy);
    }

    pub fn schedule_ramp(&self, scheduler: &mut Scheduler) {
        scheduler.schedule(
            Owner::Spawner,
            self.tuning.difficulty_increase_interval,
            Action::IncreaseDifficulty,
        );
    }

    /// One difficulty step
    pub fn increase_difficulty(&mut self) {
        if self.spawn_rate > self.tuning.min_spawn_rate {
            self.spawn_rate = (self.spawn_rate - self.tuning.spawn_rate_reduction).max(self.tuning.min_spawn_rate);
        }
        if self.enemy_speed < self.tuning.max_enemy_speed {
            self.enemy_speed = (self.enemy_speed + self.tuning.speed_increase).min(self.tuning.max_enemy_speed);
        }
        log::debug!(
            "Difficulty up: spawn every {:.2}s, speed {:.1}",
            self.spawn_rate,
            self.enemy_speed
        );
    }

    /// Pick one of `count` enemy templates
    pub fn choose_template(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            log::warn!("No enemy types to spawn, check the tuning file");
            return None;
        }
        Some(self.rng.random_range(0..count))
    }

    /// Random point on the spawn ring
    pub fn spawn_position(&mut self) -> Vec2 {
        let theta = self.rng.random_range(0.0..std::f32::consts::TAU);
        polar_to_cartesian(self.tuning.spawn_radius, theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner() -> EnemySpawner {
        EnemySpawner::new(SpawnerTuning::default(), 7)
    }

    #[test]
    fn test_difficulty_ramp_respects_bounds() {
        let mut spawner = spawner();
        for _ in 0..100 {
            spawner.increase_difficulty();
        }
        assert_eq!(spawner.spawn_rate(), 0.3);
        assert_eq!(spawner.enemy_speed(), 15.0);
        assert!((spawner.speed_bonus() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_step() {
        let mut spawner = spawner();
        spawner.increase_difficulty();
        assert!((spawner.spawn_rate() - 1.4).abs() < 1e-5);
        assert!((spawner.enemy_speed() - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_position_on_ring() {
        let mut spawner = spawner();
        for _ in 0..20 {
            let pos = spawner.spawn_position();
            assert!((pos.length() - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_choose_template() {
        let mut spawner = spawner();
        assert_eq!(spawner.choose_template(0), None);
        for _ in 0..20 {
            assert!(spawner.choose_template(3).unwrap() < 3);
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = spawner();
        let mut b = spawner();
        for _ in 0..5 {
            assert_eq!(a.spawn_position(), b.spawn_position());
        }
    }

    #[test]
    fn test_reset_cancels_and_rearms() {
        let mut scheduler = Scheduler::new();
        let mut spawner = spawner();
        spawner.start(&mut scheduler);
        spawner.increase_difficulty();
        assert_eq!(scheduler.pending(Owner::Spawner), 2);

        spawner.reset(&mut scheduler);
        assert_eq!(scheduler.pending(Owner::Spawner), 2);
        assert_eq!(spawner.spawn_rate(), 1.5);

        // Only the re-armed spawn is due after one interval
        let fired = scheduler.advance(1.5);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, Action::SpawnEnemy);
    }
}
