//! World state and core simulation types
//!
//! Everything that lives for the duration of a run: the entity pool, the
//! scheduler driving timed routines, the spawner and the player.

use glam::Vec2;

use super::camera::Camera2D;
use super::object::{EntityPool, GameObject, Handle, PoolObjectType};
use super::player::Player;
use super::spawner::EnemySpawner;
use crate::pool::PoolError;
use crate::tuning::{EffectTuning, EnemyTemplate, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Out of lives; the world stops until restarted
    GameOver,
}

/// Things that happened during a tick that the caller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player intercepted an enemy worth `score`
    EnemyIntercepted { score: u64 },
    /// An enemy reached the core
    CoreHit,
}

/// Who a scheduled task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Spawner,
    /// Auto-return timers of spawned effects
    Effects,
}

/// What a scheduled task does when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpawnEnemy,
    IncreaseDifficulty,
    ReturnToPool(Handle),
}

pub type Scheduler = crate::sched::Scheduler<Owner, Action>;

/// Everything a run needs, passed around explicitly
pub struct World {
    pub pool: EntityPool,
    pub scheduler: Scheduler,
    pub spawner: EnemySpawner,
    pub player: Player,
    pub camera: Camera2D,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    enemies: Vec<EnemyTemplate>,
    effects: EffectTuning,
}

impl World {
    /// Build the world and warm up every configured pool
    pub fn new(tuning: &Tuning) -> Result<Self, PoolError<PoolObjectType>> {
        let mut pool = EntityPool::new();
        pool.register_all(&tuning.pools, GameObject::factory)?;

        Ok(Self {
            pool,
            scheduler: Scheduler::new(),
            spawner: EnemySpawner::new(tuning.spawner.clone(), tuning.seed),
            player: Player::new(&tuning.player),
            camera: Camera2D::new(&tuning.camera),
            phase: GamePhase::Playing,
            time_ticks: 0,
            enemies: tuning.enemies.clone(),
            effects: tuning.effects.clone(),
        })
    }

    pub fn templates(&self) -> &[EnemyTemplate] {
        &self.enemies
    }

    pub fn template(&self, index: usize) -> Option<&EnemyTemplate> {
        self.enemies.get(index)
    }

    /// Start the spawner routines
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.spawner.start(&mut self.scheduler);
    }

    /// Handles of every active enemy, in pool order
    pub fn active_enemies(&self) -> Vec<Handle> {
        let mut handles = Vec::new();
        for key in self.pool.keys() {
            for handle in self.pool.active_handles(*key) {
                if self.pool.get(handle).is_some_and(|o| o.enemy().is_some()) {
                    handles.push(handle);
                }
            }
        }
        handles
    }

    /// Spawn one enemy from `template` at `position`, with its indicator
    pub fn spawn_enemy(&mut self, template: usize, position: Vec2) -> Option<Handle> {
        let Some(data) = self.enemies.get(template) else {
            log::error!("Unknown enemy template {template}");
            return None;
        };
        let pool_type = data.pool_type;
        let indicator_type = data.indicator_type;
        let speed = (data.move_speed + self.spawner.speed_bonus()).max(0.0);

        let handle = self.pool.acquire(pool_type, position, face_core(position)).ok()?;
        let indicator = indicator_type.and_then(|kind| self.pool.acquire(kind, Vec2::ZERO, 0.0).ok());

        match self.pool.get_mut(handle).and_then(GameObject::enemy_mut) {
            Some(enemy) => {
                enemy.template = template;
                enemy.speed = speed;
                enemy.indicator = indicator;
            }
            None => {
                log::error!("Pool {pool_type:?} does not hold enemies");
                self.reclaim(handle);
                if let Some(indicator) = indicator {
                    self.reclaim(indicator);
                }
                return None;
            }
        }
        Some(handle)
    }

    /// Return an enemy and its indicator to the pool
    pub fn despawn_enemy(&mut self, handle: Handle) {
        let indicator = self
            .pool
            .get_mut(handle)
            .and_then(GameObject::enemy_mut)
            .and_then(|enemy| enemy.indicator.take());
        if let Some(indicator) = indicator {
            self.reclaim(indicator);
        }
        self.reclaim(handle);
    }

    /// Return one instance to the pool. Returns false if the handle was
    /// rejected (already handed out again, or its pool is gone).
    pub fn reclaim(&mut self, handle: Handle) -> bool {
        match self.pool.release(handle) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("Skipped returning {} #{}: {err}", handle.key().as_str(), handle.index());
                false
            }
        }
    }

    /// Spawn an effect that returns itself to the pool after `duration` seconds
    pub fn spawn_effect(&mut self, kind: PoolObjectType, position: Vec2) -> Option<Handle> {
        let handle = self.pool.acquire(kind, position, 0.0).ok()?;
        let duration = match kind {
            PoolObjectType::WarningEffect => self.effects.warning_duration,
            _ => self.effects.destruction_duration,
        };
        self.scheduler.schedule(Owner::Effects, duration, Action::ReturnToPool(handle));
        Some(handle)
    }

    /// Put everything back to the start of a run.
    ///
    /// Every pooled object is reclaimed and every pending routine abandoned
    /// before the spawner is re-armed.
    pub fn reset(&mut self) {
        self.scheduler.cancel_owner(Owner::Effects);
        // Enemies own their indicator handles; clear them before the bulk reclaim
        for handle in self.active_enemies() {
            if let Some(enemy) = self.pool.get_mut(handle).and_then(GameObject::enemy_mut) {
                enemy.indicator = None;
            }
        }
        self.pool.release_all();
        self.player.reset();
        self.spawner.reset(&mut self.scheduler);
        self.phase = GamePhase::Playing;
    }
}

/// Rotation that points an object at `position` toward the core.
///
/// Sprites face +Y, hence the quarter-turn offset.
pub fn face_core(position: Vec2) -> f32 {
    let dir = -position;
    if dir == Vec2::ZERO {
        return 0.0;
    }
    crate::normalize_angle(dir.y.atan2(dir.x) + std::f32::consts::FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Poolable;

    fn world() -> World {
        World::new(&Tuning::default()).unwrap()
    }

    #[test]
    fn test_world_warms_pools() {
        let world = world();
        assert_eq!(world.pool.inactive_count(PoolObjectType::Enemy), 20);
        assert_eq!(world.pool.inactive_count(PoolObjectType::WarningEffect), 5);
    }

    #[test]
    fn test_spawn_enemy_takes_indicator() {
        let mut world = world();
        let handle = world.spawn_enemy(0, Vec2::new(20.0, 0.0)).unwrap();

        let enemy = world.pool.get(handle).unwrap().enemy().unwrap();
        assert_eq!(enemy.speed, 5.0);
        let indicator = enemy.indicator.unwrap();
        assert!(world.pool.get(indicator).unwrap().is_active());
        assert_eq!(world.pool.active_count(PoolObjectType::DistanceIndicator), 1);
        assert_eq!(world.active_enemies(), vec![handle]);
    }

    #[test]
    fn test_despawn_returns_indicator() {
        let mut world = world();
        let handle = world.spawn_enemy(0, Vec2::new(0.0, 20.0)).unwrap();
        world.despawn_enemy(handle);
        assert_eq!(world.pool.active_count(PoolObjectType::Enemy), 0);
        assert_eq!(world.pool.active_count(PoolObjectType::DistanceIndicator), 0);
    }

    #[test]
    fn test_unknown_template() {
        let mut world = world();
        assert!(world.spawn_enemy(9, Vec2::ZERO).is_none());
        assert_eq!(world.pool.active_count(PoolObjectType::Enemy), 0);
    }

    #[test]
    fn test_unregistered_indicator_pool_is_skipped() {
        let mut tuning = Tuning::default();
        tuning.pools.retain(|entry| entry.key != PoolObjectType::DistanceIndicator);
        let mut world = World::new(&tuning).unwrap();

        let handle = world.spawn_enemy(0, Vec2::new(20.0, 0.0)).unwrap();
        assert!(world.pool.get(handle).unwrap().enemy().unwrap().indicator.is_none());
    }

    #[test]
    fn test_effect_returns_after_duration() {
        let mut world = world();
        let handle = world.spawn_effect(PoolObjectType::WarningEffect, Vec2::ZERO).unwrap();
        assert_eq!(world.scheduler.pending(Owner::Effects), 1);

        let fired = world.scheduler.advance(0.5);
        assert_eq!(fired[0].action, Action::ReturnToPool(handle));
    }

    #[test]
    fn test_reset_reclaims_everything() {
        let mut world = world();
        world.start();
        for i in 0..3 {
            world.spawn_enemy(0, Vec2::new(20.0, i as f32)).unwrap();
        }
        world.spawn_effect(PoolObjectType::DestructionEffect, Vec2::ZERO).unwrap();

        world.reset();

        for kind in PoolObjectType::ALL {
            assert_eq!(world.pool.active_count(kind), 0, "{} still active", kind.as_str());
        }
        assert_eq!(world.scheduler.pending(Owner::Effects), 0);
        assert_eq!(world.scheduler.pending(Owner::Spawner), 2);
    }

    #[test]
    fn test_face_core() {
        // Enemy to the right of the core faces left: sprite up rotated by +90°
        let rot = face_core(Vec2::new(5.0, 0.0));
        assert!((crate::normalize_angle(rot - 3.0 * std::f32::consts::FRAC_PI_2)).abs() < 1e-5);
        assert_eq!(face_core(Vec2::ZERO), 0.0);
    }
}
