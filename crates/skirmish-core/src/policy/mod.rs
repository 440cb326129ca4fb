//! Decision policies.
//!
//! Every tick each entity picks one of five [`Action`]s:
//!
//! - [`learned`]: epsilon-greedy selection from the entity's policy table
//! - [`dodge`]: a scripted heuristic that biases toward the arena center and
//!   steps away from the first threatening projectile
//!
//! [`DecisionPolicy`] composes the two for one entity according to its
//! [`MovementSource`] and dodge flag.

pub mod dodge;
pub mod learned;

use glam::Vec2;
use qtable::{PolicyTable, StateIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use dodge::{DodgePlan, ScriptedDodge};
pub use learned::LearnedPolicy;

use crate::config::EntityConfig;
use crate::entity::MovementSource;

// =============================================================================
// Action
// =============================================================================

/// One of the five discrete per-tick choices. The discriminant is the
/// policy-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Step left, `(-1, 0)`.
    MoveLeft = 0,
    /// Step right, `(1, 0)`.
    MoveRight = 1,
    /// Step up, `(0, -1)`.
    MoveUp = 2,
    /// Step down, `(0, 1)`.
    MoveDown = 3,
    /// Fire at the opponent's center; no movement.
    Fire = 4,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 5;

    /// All actions in column order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUp,
        Self::MoveDown,
        Self::Fire,
    ];

    /// Policy-table column.
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Action for a column, if in range.
    #[must_use]
    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }

    /// Unit displacement; zero for [`Action::Fire`].
    #[must_use]
    pub const fn displacement(self) -> Vec2 {
        match self {
            Self::MoveLeft => Vec2::new(-1.0, 0.0),
            Self::MoveRight => Vec2::new(1.0, 0.0),
            Self::MoveUp => Vec2::new(0.0, -1.0),
            Self::MoveDown => Vec2::new(0.0, 1.0),
            Self::Fire => Vec2::ZERO,
        }
    }

    /// True for the four movement actions.
    #[must_use]
    pub const fn is_move(self) -> bool {
        !matches!(self, Self::Fire)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveLeft => write!(f, "MoveLeft"),
            Self::MoveRight => write!(f, "MoveRight"),
            Self::MoveUp => write!(f, "MoveUp"),
            Self::MoveDown => write!(f, "MoveDown"),
            Self::Fire => write!(f, "Fire"),
        }
    }
}

// =============================================================================
// DecisionPolicy
// =============================================================================

/// How one entity chooses its action and whether the dodge runs after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    movement: MovementSource,
    learned: LearnedPolicy,
    dodge: Option<ScriptedDodge>,
}

impl DecisionPolicy {
    /// Policy for an entity configured by `config`.
    #[must_use]
    pub fn for_entity(config: &EntityConfig, dodge_margin: f32) -> Self {
        Self {
            movement: config.movement,
            learned: LearnedPolicy,
            dodge: config.dodges().then(|| ScriptedDodge::new(dodge_margin)),
        }
    }

    /// Movement capability of the entity this policy drives.
    #[must_use]
    pub fn movement(&self) -> MovementSource {
        self.movement
    }

    /// The dodge heuristic, if this entity dodges.
    #[must_use]
    pub fn dodge(&self) -> Option<&ScriptedDodge> {
        self.dodge.as_ref()
    }

    /// Chooses this tick's action.
    ///
    /// Host-driven entities take `host_action` verbatim (`None` idles).
    /// All others consult their table.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        table: &PolicyTable,
        state: StateIndex,
        host_action: Option<Action>,
        rng: &mut R,
    ) -> Option<Action> {
        if self.movement.is_external() {
            host_action
        } else {
            Some(self.learned.choose(table, state, rng))
        }
    }
}
