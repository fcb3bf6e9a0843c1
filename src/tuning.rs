//! Data-driven game balance
//!
//! Loaded once at startup from a JSON file. Every field has a default, so a
//! partial file (or no file at all) is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::SaveConfig;
use crate::pool::PoolEntry;
use crate::sim::PoolObjectType;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed tuning file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("enemy template '{template}' uses pool {key:?}, which is not registered")]
    UnregisteredKey { template: String, key: PoolObjectType },
}

/// Stats and presentation of one enemy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyTemplate {
    pub name: String,
    /// Base speed; difficulty adds on top of this
    pub move_speed: f32,
    pub score_value: u64,
    pub pool_type: PoolObjectType,
    /// Off-screen indicator pool, `None` for no indicator
    pub indicator_type: Option<PoolObjectType>,
    /// Spawned where the enemy is intercepted, `None` for no effect
    pub destruction_effect_type: Option<PoolObjectType>,
    /// Indicator colour when the enemy is far away (RGBA)
    pub far_color: Vec4,
    /// Indicator colour when the enemy is close (RGBA)
    pub near_color: Vec4,
    /// Distance at which the indicator is fully `near_color`
    pub min_color_distance: f32,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            name: "Drone".to_string(),
            move_speed: 5.0,
            score_value: 10,
            pool_type: PoolObjectType::Enemy,
            indicator_type: Some(PoolObjectType::DistanceIndicator),
            destruction_effect_type: Some(PoolObjectType::DestructionEffect),
            far_color: Vec4::new(0.0, 1.0, 0.0, 1.0),
            near_color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            min_color_distance: 2.0,
        }
    }
}

/// Spawn timing and difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpawnerTuning {
    /// Seconds between spawns at the start of a run
    pub initial_spawn_rate: f32,
    /// Distance from the core where enemies appear
    pub spawn_radius: f32,
    /// Seconds between difficulty steps
    pub difficulty_increase_interval: f32,
    pub min_spawn_rate: f32,
    pub spawn_rate_reduction: f32,
    pub initial_enemy_speed: f32,
    pub max_enemy_speed: f32,
    pub speed_increase: f32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            initial_spawn_rate: 1.5,
            spawn_radius: 20.0,
            difficulty_increase_interval: 10.0,
            min_spawn_rate: 0.3,
            spawn_rate_reduction: 0.1,
            initial_enemy_speed: 5.0,
            max_enemy_speed: 15.0,
            speed_increase: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerTuning {
    /// Degrees per second around the orbit
    pub rotation_speed: f32,
    /// Orbit distance from the core
    pub orbit_radius: f32,
    pub max_lives: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            rotation_speed: 100.0,
            orbit_radius: 2.0,
            max_lives: crate::state::DEFAULT_LIVES,
        }
    }
}

/// How long pooled effects stay out before returning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectTuning {
    pub destruction_duration: f32,
    pub warning_duration: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            destruction_duration: 1.0,
            warning_duration: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    /// World units visible vertically
    pub view_height: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            view_height: 24.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    /// RNG seed for spawn positions and enemy choice
    pub seed: u64,
    /// Pool registration, in order
    pub pools: Vec<PoolEntry<PoolObjectType>>,
    pub enemies: Vec<EnemyTemplate>,
    pub spawner: SpawnerTuning,
    pub player: PlayerTuning,
    pub effects: EffectTuning,
    pub camera: CameraTuning,
    pub save: SaveConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            pools: vec![
                PoolEntry {
                    key: PoolObjectType::Enemy,
                    initial_count: 20,
                },
                PoolEntry {
                    key: PoolObjectType::DistanceIndicator,
                    initial_count: 20,
                },
                PoolEntry {
                    key: PoolObjectType::DestructionEffect,
                    initial_count: 10,
                },
                PoolEntry {
                    key: PoolObjectType::WarningEffect,
                    initial_count: 5,
                },
            ],
            enemies: vec![EnemyTemplate::default()],
            spawner: SpawnerTuning::default(),
            player: PlayerTuning::default(),
            effects: EffectTuning::default(),
            camera: CameraTuning::default(),
            save: SaveConfig::default(),
        }
    }
}

impl Tuning {
    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No tuning file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(TuningError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let tuning: Tuning = serde_json::from_str(&json).map_err(|source| TuningError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn is_registered(&self, key: PoolObjectType) -> bool {
        self.pools.iter().any(|entry| entry.key == key)
    }

    /// Every pool an enemy template refers to must be registered
    pub fn validate(&self) -> Result<(), TuningError> {
        for template in &self.enemies {
            let keys = [
                Some(template.pool_type),
                template.indicator_type,
                template.destruction_effect_type,
            ];
            for key in keys.into_iter().flatten() {
                if !self.is_registered(key) {
                    return Err(TuningError::UnregisteredKey {
                        template: template.name.clone(),
                        key,
                    });
                }
            }
        }
        Ok(())
    }
}
