//! Pooled game objects

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::pool::{Factory, ObjectPool, PoolHandle, Poolable};

/// Every kind of object the game pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolObjectType {
    Enemy,
    DistanceIndicator,
    DestructionEffect,
    WarningEffect,
}

impl PoolObjectType {
    pub const ALL: [PoolObjectType; 4] = [
        PoolObjectType::Enemy,
        PoolObjectType::DistanceIndicator,
        PoolObjectType::DestructionEffect,
        PoolObjectType::WarningEffect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolObjectType::Enemy => "Enemy",
            PoolObjectType::DistanceIndicator => "DistanceIndicator",
            PoolObjectType::DestructionEffect => "DestructionEffect",
            PoolObjectType::WarningEffect => "WarningEffect",
        }
    }
}

pub type EntityPool = ObjectPool<PoolObjectType, GameObject>;
pub type Handle = PoolHandle<PoolObjectType>;

/// Per-enemy runtime state
#[derive(Debug, Clone, Default)]
pub struct EnemyState {
    /// Index into the enemy templates
    pub template: usize,
    /// World units per second toward the core
    pub speed: f32,
    /// Off-screen distance indicator owned by this enemy
    pub indicator: Option<Handle>,
}

/// Screen-space marker showing how far an enemy is from the core
#[derive(Debug, Clone, Default)]
pub struct IndicatorState {
    pub label: String,
    pub color: Vec4,
}

#[derive(Debug, Clone)]
pub enum Body {
    Enemy(EnemyState),
    Indicator(IndicatorState),
    /// Plays for a while, then goes back to the pool
    Effect,
}

/// A pooled object. Position is world space, except for indicators which
/// live in screen space.
#[derive(Debug, Clone)]
pub struct GameObject {
    pub kind: PoolObjectType,
    active: bool,
    /// Drawn this frame (an active object can stay hidden until placed)
    pub visible: bool,
    pub position: Vec2,
    /// Radians
    pub rotation: f32,
    pub body: Body,
}

impl GameObject {
    /// Fresh instance for `kind`, as the pool factory creates it
    pub fn prefab(kind: PoolObjectType) -> Self {
        let body = match kind {
            PoolObjectType::Enemy => Body::Enemy(EnemyState::default()),
            PoolObjectType::DistanceIndicator => Body::Indicator(IndicatorState::default()),
            PoolObjectType::DestructionEffect | PoolObjectType::WarningEffect => Body::Effect,
        };
        Self {
            kind,
            active: false,
            visible: false,
            position: Vec2::ZERO,
            rotation: 0.0,
            body,
        }
    }

    pub fn factory(kind: PoolObjectType) -> Factory<GameObject> {
        Box::new(move || GameObject::prefab(kind))
    }

    pub fn enemy(&self) -> Option<&EnemyState> {
        match &self.body {
            Body::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.body {
            Body::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn indicator(&self) -> Option<&IndicatorState> {
        match &self.body {
            Body::Indicator(indicator) => Some(indicator),
            _ => None,
        }
    }

    pub fn indicator_mut(&mut self) -> Option<&mut IndicatorState> {
        match &mut self.body {
            Body::Indicator(indicator) => Some(indicator),
            _ => None,
        }
    }
}

impl Poolable for GameObject {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        // Enemies and effects show up as soon as they spawn; indicators wait
        // for their first placement.
        self.visible = active && self.kind != PoolObjectType::DistanceIndicator;
    }

    fn place(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefab_body_matches_kind() {
        assert!(GameObject::prefab(PoolObjectType::Enemy).enemy().is_some());
        assert!(GameObject::prefab(PoolObjectType::DistanceIndicator).indicator().is_some());
        assert!(matches!(
            GameObject::prefab(PoolObjectType::WarningEffect).body,
            Body::Effect
        ));
    }

    #[test]
    fn test_indicator_hidden_until_placed() {
        let mut pool = EntityPool::new();
        pool.register(
            PoolObjectType::DistanceIndicator,
            GameObject::factory(PoolObjectType::DistanceIndicator),
            1,
        )
        .unwrap();

        let handle = pool.acquire(PoolObjectType::DistanceIndicator, Vec2::ZERO, 0.0).unwrap();
        let indicator = pool.get(handle).unwrap();
        assert!(indicator.is_active());
        assert!(!indicator.visible);
    }

    #[test]
    fn test_enemy_visible_on_spawn() {
        let mut enemy = GameObject::prefab(PoolObjectType::Enemy);
        enemy.set_active(true);
        assert!(enemy.visible);
        enemy.set_active(false);
        assert!(!enemy.visible);
    }
}
