//! Tick results handed to the host.
//!
//! A [`TickResult`] is a read-only snapshot of both combatants after a tick:
//! positions, health, the action each took, the reward each received, what
//! happened to them ([`AgentEvents`]) and their live projectiles. The host
//! turns it into pixels; nothing in it borrows from the simulation.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimConfig;
//! use skirmish_core::entity::EntityId;
//! use skirmish_core::simulation::Simulation;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//!
//! let result = sim.step(1.0, 16.0, &mut rng).unwrap();
//! assert_eq!(result.tick, 1);
//! assert!(!result.is_terminal());
//! assert_eq!(result.entity(EntityId::FIRST).health, 100);
//! ```

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{CombatEntity, EntityId};
use crate::policy::Action;
use crate::projectile::{Projectile, ProjectileId};

bitflags! {
    /// Things that happened to one entity during a tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AgentEvents: u8 {
        /// A projectile was spawned.
        const FIRED = 1 << 0;
        /// Fire was chosen but the cooldown had not elapsed.
        const COOLDOWN_BLOCKED = 1 << 1;
        /// One of this entity's projectiles hit the opponent.
        const HIT_LANDED = 1 << 2;
        /// An opposing projectile hit this entity.
        const HIT_TAKEN = 1 << 3;
        /// The scripted dodge stepped away from a projectile.
        const DODGED = 1 << 4;
        /// Health reached zero this tick.
        const DEFEATED = 1 << 5;
    }
}

/// Lifecycle of a simulation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimStatus {
    /// Ticks are being processed.
    Running,
    /// One entity was defeated; `winner` is the survivor (or the tie-break).
    Terminated {
        /// The winning entity.
        winner: EntityId,
    },
    /// An invariant broke; the round stopped without a winner.
    Aborted,
}

impl SimStatus {
    /// True while ticks still advance the round.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Per-tick accounting for one entity, filled in while a tick runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentLedger {
    /// Action taken this tick.
    pub action: Option<Action>,
    /// Reward accumulated this tick.
    pub reward: f64,
    /// Events raised this tick.
    pub events: AgentEvents,
}

/// A projectile as the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Identifier within the owner's set.
    pub id: ProjectileId,
    /// Center position.
    pub position: Vec2,
    /// Unit direction of travel.
    pub direction: Vec2,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id(),
            position: projectile.position(),
            direction: projectile.direction(),
        }
    }
}

/// One entity as the host sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Which combatant.
    pub id: EntityId,
    /// Top-left corner.
    pub position: Vec2,
    /// Center of the bounding box.
    pub center: Vec2,
    /// Remaining health.
    pub health: u32,
    /// Action taken this tick, if any.
    pub action: Option<Action>,
    /// Reward received this tick.
    pub reward: f64,
    /// Events raised this tick.
    pub events: AgentEvents,
    /// Projectiles this entity has in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl EntitySnapshot {
    /// Snapshot of `entity` with this tick's ledger.
    #[must_use]
    pub fn capture(entity: &CombatEntity, ledger: &AgentLedger) -> Self {
        Self {
            id: entity.id(),
            position: entity.position(),
            center: entity.center(),
            health: entity.health(),
            action: ledger.action,
            reward: ledger.reward,
            events: ledger.events,
            projectiles: entity.projectiles().iter().map(ProjectileSnapshot::from).collect(),
        }
    }
}

/// Everything the host needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Ticks processed so far in this round.
    pub tick: u64,
    /// Host time passed to the tick.
    pub time: f64,
    /// Both combatants, indexed by [`EntityId::index`].
    pub entities: [EntitySnapshot; 2],
    /// Round status after the tick.
    pub status: SimStatus,
}

impl TickResult {
    /// Snapshot of one entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> &EntitySnapshot {
        &self.entities[id.index()]
    }

    /// True once the round has ended, by victory or abort.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.status.is_running()
    }

    /// The winner, once terminated.
    #[must_use]
    pub fn winner(&self) -> Option<EntityId> {
        match self.status {
            SimStatus::Terminated { winner } => Some(winner),
            SimStatus::Running | SimStatus::Aborted => None,
        }
    }
}
