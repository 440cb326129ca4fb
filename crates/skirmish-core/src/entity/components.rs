//! Component structs held by a [`CombatEntity`](super::CombatEntity).

use serde::{Deserialize, Serialize};

/// Who is allowed to move an entity.
///
/// Chosen once at construction; the entity never inspects a type flag while
/// moving, it only asks its movement source whether a move origin is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementSource {
    /// Learned actions move the entity; a scripted dodge may add to them.
    LearnedPolicy,
    /// Only scripted steps move the entity; learned actions may still fire.
    Scripted,
    /// Only the host moves the entity, through per-tick input.
    ExternalInput,
}

impl MovementSource {
    /// True if a move requested by `origin` should be applied.
    #[must_use]
    pub const fn accepts(self, origin: MoveOrigin) -> bool {
        matches!(
            (self, origin),
            (Self::LearnedPolicy, MoveOrigin::Policy | MoveOrigin::Script)
                | (Self::Scripted, MoveOrigin::Script)
                | (Self::ExternalInput, MoveOrigin::Host)
        )
    }

    /// True if the entity's action comes from the host rather than its table.
    #[must_use]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::ExternalInput)
    }
}

/// Where a move request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOrigin {
    /// The entity's learned action.
    Policy,
    /// The scripted dodge heuristic.
    Script,
    /// Host input.
    Host,
}

/// Cooldown-gated weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    /// Minimum time between fires.
    pub cooldown: f64,
    /// Time of the last successful fire (or of the round start).
    pub last_fire_time: f64,
}

impl WeaponState {
    /// Weapon whose cooldown clock starts at `now`.
    #[must_use]
    pub fn new(cooldown: f64, now: f64) -> Self {
        Self {
            cooldown,
            last_fire_time: now,
        }
    }

    /// Strictly more than `cooldown` has elapsed since the last fire.
    #[must_use]
    pub fn is_ready(&self, now: f64) -> bool {
        now - self.last_fire_time > self.cooldown
    }
}
