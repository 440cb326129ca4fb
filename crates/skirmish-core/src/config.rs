//! Simulation configuration.
//!
//! Everything is fixed at construction; there is no runtime reconfiguration.
//! [`SimConfig::default()`] reproduces the reference duel: an 800x600 arena,
//! 50-unit combatants moving 5 units per action, a 500-unit fire cooldown,
//! 10-unit projectiles dealing 10 damage, and the second entity dodging.

use glam::Vec2;
use qtable::LearningConfig;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, MovementSource};
use crate::error::ConfigError;
use crate::policy::Action;

/// Arena dimensions in whole units.
///
/// The state index grid has one cell per unit, so `width * height` is the
/// size of the state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Width `W`.
    pub width: u32,
    /// Height `H`.
    pub height: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Per-entity physical and control configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Center of the entity at spawn.
    pub spawn_center: Vec2,
    /// Side length of the square bounding box.
    pub extent: f32,
    /// Displacement per unit move.
    pub speed: f32,
    /// Starting health.
    pub health: u32,
    /// Minimum time between two fires.
    pub fire_cooldown: f64,
    /// Who may move this entity.
    pub movement: MovementSource,
    /// Whether the scripted dodge runs after the learned action.
    pub scripted_dodge: bool,
}

impl EntityConfig {
    /// Reference configuration centered at `spawn_center`.
    #[must_use]
    pub fn at(spawn_center: Vec2) -> Self {
        Self {
            spawn_center,
            extent: 50.0,
            speed: 5.0,
            health: 100,
            fire_cooldown: 500.0,
            movement: MovementSource::LearnedPolicy,
            scripted_dodge: false,
        }
    }

    /// Enables the scripted dodge.
    #[must_use]
    pub fn dodging(self) -> Self {
        Self {
            scripted_dodge: true,
            ..self
        }
    }

    /// Replaces the movement source.
    #[must_use]
    pub fn with_movement(self, movement: MovementSource) -> Self {
        Self { movement, ..self }
    }

    /// True if the dodge heuristic applies to this entity.
    #[must_use]
    pub fn dodges(&self) -> bool {
        self.scripted_dodge || self.movement == MovementSource::Scripted
    }
}

/// Projectile parameters shared by both entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Distance travelled per unit of `dt`.
    pub speed: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    /// Health removed on hit.
    pub damage: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            width: 5.0,
            height: 10.0,
            damage: 10,
        }
    }
}

impl ProjectileConfig {
    /// Bounding box size.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Complete configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Arena size.
    pub arena: ArenaConfig,
    /// The two combatants, indexed by [`EntityId::index`].
    pub entities: [EntityConfig; 2],
    /// Projectile parameters.
    pub projectile: ProjectileConfig,
    /// Reward magnitude for a hit (+ to the shooter, − to the target).
    pub hit_reward: f64,
    /// Total growth of the entity box when scanning for threats, per axis.
    pub dodge_margin: f32,
    /// Q-learning hyperparameters, shared by both tables.
    pub learning: LearningConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        let arena = ArenaConfig::default();
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (arena.width as f32, arena.height as f32);
        Self {
            arena,
            entities: [
                EntityConfig::at(Vec2::new(w / 4.0, h / 2.0 - 50.0)),
                EntityConfig::at(Vec2::new(3.0 * w / 4.0, h / 2.0 - 50.0)).dodging(),
            ],
            projectile: ProjectileConfig::default(),
            hit_reward: 10.0,
            dodge_margin: 50.0,
            learning: LearningConfig::default(),
        }
    }
}

impl SimConfig {
    /// Configuration for one entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> &EntityConfig {
        &self.entities[id.index()]
    }

    /// Fails fast on geometry or parameters the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ArenaConfig { width, height } = self.arena;
        if width == 0 || height == 0 {
            return Err(ConfigError::ArenaSize { width, height });
        }
        #[allow(clippy::cast_precision_loss)]
        let size = Vec2::new(width as f32, height as f32);

        let fits = |extent: Vec2| extent.cmpgt(Vec2::ZERO).all() && extent.cmple(size).all();

        for id in EntityId::ALL {
            let entity = self.entity(id);
            let extent = Vec2::splat(entity.extent);
            if !fits(extent) {
                return Err(ConfigError::Extent {
                    what: "entity",
                    extent,
                    width,
                    height,
                });
            }
            if !(entity.speed.is_finite() && entity.speed > 0.0) {
                return Err(ConfigError::Speed {
                    what: "entity",
                    speed: entity.speed,
                });
            }
            if !(entity.fire_cooldown.is_finite() && entity.fire_cooldown >= 0.0) {
                return Err(ConfigError::Cooldown(entity.fire_cooldown));
            }
            let spawn = entity.spawn_center;
            if !(spawn.is_finite() && spawn.cmpge(Vec2::ZERO).all() && spawn.cmple(size).all()) {
                return Err(ConfigError::Spawn { entity: id, spawn });
            }
        }

        if !fits(self.projectile.extent()) {
            return Err(ConfigError::Extent {
                what: "projectile",
                extent: self.projectile.extent(),
                width,
                height,
            });
        }
        if !(self.projectile.speed.is_finite() && self.projectile.speed > 0.0) {
            return Err(ConfigError::Speed {
                what: "projectile",
                speed: self.projectile.speed,
            });
        }
        if !(self.hit_reward.is_finite() && self.hit_reward >= 0.0) {
            return Err(ConfigError::Scalar {
                what: "hit reward",
                value: self.hit_reward,
            });
        }
        if !(self.dodge_margin.is_finite() && self.dodge_margin >= 0.0) {
            return Err(ConfigError::Scalar {
                what: "dodge margin",
                value: f64::from(self.dodge_margin),
            });
        }

        self.learning.validate()?;
        if self.learning.action_count != Action::COUNT {
            return Err(ConfigError::ActionCount {
                expected: Action::COUNT,
                found: self.learning.action_count,
            });
        }
        Ok(())
    }
}
