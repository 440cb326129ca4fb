//! Resolver phase of a tick.
//!
//! After both entities have acted, resolvers advance the world and settle the
//! consequences. They run in a fixed order on a [`TickFrame`]:
//!
//! 1. [`ProjectilePhysics`]: move projectiles, cull those that left the arena
//! 2. [`CombatResolver`]: projectile/entity collisions, damage and rewards
//!
//! # Invariants
//!
//! - Resolvers process entities in [`EntityId::ALL`](crate::entity::EntityId::ALL)
//!   order
//! - Resolvers never touch policy tables; learning happens after resolution
//! - Given the same frame, a resolver produces the same result

mod combat;
mod physics;

pub use combat::CombatResolver;
pub use physics::ProjectilePhysics;

use crate::arena::Arena;
use crate::entity::CombatEntity;
use crate::output::AgentLedger;

/// Mutable view of the world handed to each resolver.
#[derive(Debug)]
pub struct TickFrame<'a> {
    /// Arena geometry.
    pub arena: &'a Arena,
    /// Both combatants, indexed by [`EntityId::index`](crate::entity::EntityId::index).
    pub entities: &'a mut [CombatEntity; 2],
    /// Per-entity reward and event accounting for this tick.
    pub ledgers: &'a mut [AgentLedger; 2],
    /// Elapsed time for this tick, in nominal frames.
    pub dt: f32,
}

/// One phase of tick resolution.
///
/// # Example
///
/// ```
/// use skirmish_core::resolver::{Resolver, TickFrame};
///
/// struct NoOp;
///
/// impl Resolver for NoOp {
///     fn name(&self) -> &'static str {
///         "noop"
///     }
///
///     fn resolve(&self, _frame: &mut TickFrame<'_>) {}
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies this phase to the frame.
    fn resolve(&self, frame: &mut TickFrame<'_>);
}

/// The default resolver pipeline, in execution order.
#[must_use]
pub fn default_pipeline(damage: u32, hit_reward: f64) -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(ProjectilePhysics::new()),
        Box::new(CombatResolver::new(damage, hit_reward)),
    ]
}
