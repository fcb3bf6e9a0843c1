//! Fixed timestep simulation tick
//!
//! One call per frame: player movement, scheduled routines, enemy movement,
//! contacts, then the late pass that places indicators once everything has
//! moved.

use glam::Vec2;

use super::contact::{Contact, detect_contact};
use super::object::{GameObject, Handle};
use super::state::{Action, GameEvent, GamePhase, World, face_core};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target orbit angle (from the pointer, while held)
    pub target_theta: Option<f32>,
    /// Autopilot: chase the enemy closest to the core
    pub idle_mode: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    if world.phase == GamePhase::GameOver {
        return Vec::new();
    }
    world.time_ticks += 1;

    let target = if input.idle_mode {
        autopilot_target(world)
    } else {
        input.target_theta
    };
    if let Some(target) = target {
        world.player.move_toward(target, dt);
    }

    run_scheduled(world, dt);

    let events = move_enemies(world, dt);
    late_update(world);
    events
}

/// Handle every routine step that came due
fn run_scheduled(world: &mut World, dt: f32) {
    for fired in world.scheduler.advance(dt) {
        match fired.action {
            Action::SpawnEnemy => {
                let count = world.templates().len();
                if let Some(template) = world.spawner.choose_template(count) {
                    let position = world.spawner.spawn_position();
                    world.spawn_enemy(template, position);
                }
                world.spawner.schedule_spawn(&mut world.scheduler);
            }
            Action::IncreaseDifficulty => {
                world.spawner.increase_difficulty();
                world.spawner.schedule_ramp(&mut world.scheduler);
            }
            Action::ReturnToPool(handle) => {
                if !world.reclaim(handle) {
                    log::warn!("Effect timer fired for a reclaimed {}", handle.key().as_str());
                }
            }
        }
    }
}

/// Move every enemy toward the core and resolve contacts
fn move_enemies(world: &mut World, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let player_pos = world.player.position();

    for handle in world.active_enemies() {
        let Some(obj) = world.pool.get_mut(handle) else {
            continue;
        };
        let speed = obj.enemy().map_or(0.0, |e| e.speed);
        obj.position = move_towards(obj.position, Vec2::ZERO, speed * dt);
        obj.rotation = face_core(obj.position);
        let position = obj.position;

        match detect_contact(position, player_pos) {
            Some(Contact::Player) => {
                events.push(intercept(world, handle, position));
            }
            Some(Contact::Core) => {
                world.spawn_effect(super::PoolObjectType::WarningEffect, position);
                world.despawn_enemy(handle);
                events.push(GameEvent::CoreHit);
            }
            None => {}
        }
    }
    events
}

fn intercept(world: &mut World, handle: Handle, position: Vec2) -> GameEvent {
    let template = world
        .pool
        .get(handle)
        .and_then(GameObject::enemy)
        .and_then(|enemy| world.template(enemy.template));
    let score = template.map_or(0, |t| t.score_value);
    let effect = template.and_then(|t| t.destruction_effect_type);

    if let Some(effect) = effect {
        world.spawn_effect(effect, position);
    }
    world.despawn_enemy(handle);
    GameEvent::EnemyIntercepted { score }
}

/// Runs after all movement: place each enemy's indicator in screen space
pub fn late_update(world: &mut World) {
    for handle in world.active_enemies() {
        let Some(obj) = world.pool.get(handle) else {
            continue;
        };
        let Some(enemy) = obj.enemy() else {
            continue;
        };
        let Some(indicator) = enemy.indicator else {
            continue;
        };

        let position = obj.position;
        let distance = position.length();
        let color = world.template(enemy.template).map(|t| {
            let span = (world.spawner.spawn_radius() - t.min_color_distance).max(f32::EPSILON);
            let far = ((distance - t.min_color_distance) / span).clamp(0.0, 1.0);
            t.near_color.lerp(t.far_color, far)
        });
        let screen_pos = world.camera.indicator_position(position);

        let Some(marker) = world.pool.get_mut(indicator) else {
            continue;
        };
        marker.position = screen_pos;
        marker.visible = true;
        if let Some(state) = marker.indicator_mut() {
            state.label = format!("{distance:.0}M");
            if let Some(color) = color {
                state.color = color;
            }
        }
    }
}

/// Pick a target angle for idle/demo play: the enemy closest to the core
fn autopilot_target(world: &World) -> Option<f32> {
    world
        .active_enemies()
        .into_iter()
        .filter_map(|handle| world.pool.get(handle))
        .map(|obj| obj.position)
        .min_by(|a, b| {
            a.length()
                .partial_cmp(&b.length())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|pos| pos.y.atan2(pos.x))
}

/// Step from `current` toward `target` by at most `max_step`
fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_step || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_step
    }
}
