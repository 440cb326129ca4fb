//! Scripted dodge heuristic.
//!
//! The plan is a single unit step:
//!
//! 1. Center bias: one step toward the arena center on each axis.
//! 2. Threat scan: opposing projectiles are checked in spawn order against the
//!    entity box inflated by `margin`. The first overlap stops the scan and
//!    its step replaces the center bias: away from the projectile on every
//!    axis where the two top-left corners differ.

use glam::Vec2;

use crate::arena::Arena;
use crate::entity::CombatEntity;
use crate::projectile::{Projectile, ProjectileId};

/// Sign with a zero for zero, unlike `f32::signum`.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The step chosen by [`ScriptedDodge::plan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgePlan {
    /// Unit step per axis, each component in `{-1, 0, 1}`.
    pub step: Vec2,
    /// Projectile that triggered the dodge, if any.
    pub threat: Option<ProjectileId>,
}

impl DodgePlan {
    /// True if the step avoids a projectile rather than seeking the center.
    #[must_use]
    pub fn is_evasive(&self) -> bool {
        self.threat.is_some()
    }
}

/// Center-seeking, first-threat dodge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedDodge {
    margin: f32,
}

impl ScriptedDodge {
    /// Dodge that inflates the entity box by `margin` in total per axis.
    #[must_use]
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// Total inflation per axis.
    #[must_use]
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Plans one step for `entity` given the opponent's projectiles.
    pub fn plan<'a, I>(&self, entity: &CombatEntity, arena: &Arena, threats: I) -> DodgePlan
    where
        I: IntoIterator<Item = &'a Projectile>,
    {
        let to_center = arena.center() - entity.center();
        let bias = Vec2::new(sign(to_center.x), sign(to_center.y));

        let body = entity.rect();
        let zone = body.inflate(Vec2::splat(self.margin));

        let Some(threat) = threats.into_iter().find(|p| p.rect().intersects(&zone)) else {
            return DodgePlan {
                step: bias,
                threat: None,
            };
        };

        // Away from the projectile: positive when it sits left of / above us
        let away = body.min - threat.rect().min;
        DodgePlan {
            step: Vec2::new(sign(away.x), sign(away.y)),
            threat: Some(threat.id()),
        }
    }
}
