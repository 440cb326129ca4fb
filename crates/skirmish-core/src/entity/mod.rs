//! Combat entities.
//!
//! This module provides the two combatants of a duel:
//! - [`EntityId`]: identity of one of the two slots
//! - [`CombatEntity`]: position, health, weapon and owned projectiles
//! - [`MovementSource`]: the capability deciding who may move an entity
//!
//! Health reaching zero is not acted on here; the simulation checks
//! [`CombatEntity::is_defeated`] at the end of each tick.
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use skirmish_core::config::{EntityConfig, ProjectileConfig};
//! use skirmish_core::entity::{CombatEntity, EntityId, FireOutcome, MoveOrigin};
//! use glam::Vec2;
//!
//! let arena = Arena::new(800, 600).unwrap();
//! let mut entity = CombatEntity::new(
//!     EntityId::FIRST,
//!     &EntityConfig::at(Vec2::new(200.0, 250.0)),
//!     &arena,
//!     0.0,
//! );
//!
//! assert!(entity.move_by(&arena, MoveOrigin::Policy, 1.0, 0.0));
//! assert_eq!(entity.position(), Vec2::new(180.0, 225.0));
//!
//! let outcome = entity.try_fire(600.0, Vec2::new(600.0, 250.0), &ProjectileConfig::default());
//! assert_eq!(outcome, FireOutcome::Fired);
//! assert_eq!(entity.projectiles().len(), 1);
//! ```

pub mod components;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub use components::{MoveOrigin, MovementSource, WeaponState};

use crate::arena::{Arena, Rect};
use crate::config::{EntityConfig, ProjectileConfig};
use crate::projectile::ProjectileSet;

// =============================================================================
// EntityId
// =============================================================================

/// Identity of one of the two combatants.
///
/// Ordering follows the slot index, which is also the deterministic order in
/// which the simulation processes entities.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// The first combatant (left side by default).
    pub const FIRST: Self = Self(0);
    /// The second combatant (right side, dodging by default).
    pub const SECOND: Self = Self(1);
    /// Both combatants in processing order.
    pub const ALL: [Self; 2] = [Self::FIRST, Self::SECOND];

    /// Raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Slot index into per-entity arrays.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other combatant.
    #[must_use]
    pub const fn opponent(self) -> Self {
        if self.0 == 0 {
            Self::SECOND
        } else {
            Self::FIRST
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CombatEntity
// =============================================================================

/// Result of a fire attempt. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireOutcome {
    /// A projectile was spawned and the cooldown restarted.
    Fired,
    /// The cooldown has not elapsed; nothing happened.
    CoolingDown,
    /// The target coincides with the muzzle; nothing happened.
    Degenerate,
}

/// One combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEntity {
    id: EntityId,
    /// Top-left corner of the bounding box.
    position: Vec2,
    extent: f32,
    speed: f32,
    health: u32,
    weapon: WeaponState,
    movement: MovementSource,
    projectiles: ProjectileSet,
}

impl CombatEntity {
    /// Spawns an entity centered at its configured spawn point.
    ///
    /// `now` starts the cooldown clock, so the first fire is possible once
    /// `fire_cooldown` has elapsed after the round began.
    #[must_use]
    pub fn new(id: EntityId, config: &EntityConfig, arena: &Arena, now: f64) -> Self {
        let extent = Vec2::splat(config.extent);
        let position = arena.clamp_to_arena(config.spawn_center - extent * 0.5, extent);
        Self {
            id,
            position,
            extent: config.extent,
            speed: config.speed,
            health: config.health,
            weapon: WeaponState::new(config.fire_cooldown, now),
            movement: config.movement,
            projectiles: ProjectileSet::new(),
        }
    }

    /// Identity of this entity.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Center of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.extent * 0.5)
    }

    /// Bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, Vec2::splat(self.extent))
    }

    /// Side length of the bounding box.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// True once health reached zero.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Movement capability.
    #[must_use]
    pub fn movement(&self) -> MovementSource {
        self.movement
    }

    /// Weapon cooldown state.
    #[must_use]
    pub fn weapon(&self) -> &WeaponState {
        &self.weapon
    }

    /// Projectiles this entity fired that are still in flight.
    #[must_use]
    pub fn projectiles(&self) -> &ProjectileSet {
        &self.projectiles
    }

    /// Mutable access to the owned projectiles.
    pub fn projectiles_mut(&mut self) -> &mut ProjectileSet {
        &mut self.projectiles
    }

    /// Moves by `(dx, dy) * speed` and clamps into the arena.
    ///
    /// Returns `false`, without moving, if the movement source does not
    /// accept moves from `origin`.
    pub fn move_by(&mut self, arena: &Arena, origin: MoveOrigin, dx: f32, dy: f32) -> bool {
        if !self.movement.accepts(origin) {
            return false;
        }
        let target = self.position + Vec2::new(dx, dy) * self.speed;
        self.position = arena.clamp_to_arena(target, Vec2::splat(self.extent));
        true
    }

    /// Places the entity at `position`, clamped, regardless of movement source.
    pub fn place(&mut self, arena: &Arena, position: Vec2) {
        self.position = arena.clamp_to_arena(position, Vec2::splat(self.extent));
    }

    /// Fires from the entity center toward `target` if the cooldown allows.
    pub fn try_fire(&mut self, now: f64, target: Vec2, projectile: &ProjectileConfig) -> FireOutcome {
        if !self.weapon.is_ready(now) {
            return FireOutcome::CoolingDown;
        }
        let origin = self.center();
        let spawned = self
            .projectiles
            .spawn(origin, target, projectile.speed, projectile.extent())
            .map(|p| p.id());
        match spawned {
            Some(projectile_id) => {
                self.weapon.last_fire_time = now;
                debug!(entity = %self.id, projectile_id, now, "fired");
                FireOutcome::Fired
            }
            None => {
                warn!(entity = %self.id, ?target, "degenerate aim, fire skipped");
                FireOutcome::Degenerate
            }
        }
    }

    /// Reduces health by `amount`, saturating at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Respawns for a new round: spawn position, full health, fresh cooldown
    /// clock starting at `now`, no projectiles.
    pub fn respawn(&mut self, config: &EntityConfig, arena: &Arena, now: f64) {
        let projectiles = std::mem::take(&mut self.projectiles);
        *self = Self::new(self.id, config, arena, now);
        self.projectiles = projectiles;
        self.projectiles.clear();
    }
}
