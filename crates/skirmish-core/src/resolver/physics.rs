//! Projectile integration.
//!
//! Every live projectile moves by `direction * speed * dt`; projectiles that
//! end up fully past any arena edge are dropped.

use tracing::trace;

use super::{Resolver, TickFrame};

/// Advances every entity's projectiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectilePhysics;

impl ProjectilePhysics {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for ProjectilePhysics {
    fn name(&self) -> &'static str {
        "projectile_physics"
    }

    fn resolve(&self, frame: &mut TickFrame<'_>) {
        for entity in frame.entities.iter_mut() {
            let culled = entity.projectiles_mut().advance(frame.dt, frame.arena);
            if culled > 0 {
                trace!(entity = %entity.id(), culled, "projectiles left the arena");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::config::{EntityConfig, ProjectileConfig};
    use crate::entity::{CombatEntity, EntityId};
    use crate::output::AgentLedger;
    use glam::Vec2;

    #[test]
    fn advances_and_culls_both_sets() {
        let arena = Arena::new(800, 600).unwrap();
        let projectile = ProjectileConfig::default();
        let mut entities = [
            CombatEntity::new(EntityId::FIRST, &EntityConfig::at(Vec2::new(200.0, 250.0)), &arena, 0.0),
            CombatEntity::new(EntityId::SECOND, &EntityConfig::at(Vec2::new(600.0, 250.0)), &arena, 0.0),
        ];
        entities[0].try_fire(501.0, Vec2::new(600.0, 250.0), &projectile);
        entities[1].try_fire(501.0, Vec2::new(600.0, 0.0), &projectile);
        let mut ledgers = [AgentLedger::default(); 2];

        let mut frame = TickFrame {
            arena: &arena,
            entities: &mut entities,
            ledgers: &mut ledgers,
            dt: 1.0,
        };
        ProjectilePhysics::new().resolve(&mut frame);

        let first = entities[0].projectiles().iter().next().unwrap();
        assert_eq!(first.position(), Vec2::new(210.0, 250.0));
        let second = entities[1].projectiles().iter().next().unwrap();
        assert_eq!(second.position(), Vec2::new(600.0, 240.0));

        // Long enough for the upward shot to leave through the top edge
        let mut frame = TickFrame {
            arena: &arena,
            entities: &mut entities,
            ledgers: &mut ledgers,
            dt: 30.0,
        };
        ProjectilePhysics::new().resolve(&mut frame);
        assert_eq!(entities[0].projectiles().len(), 1);
        assert!(entities[1].projectiles().is_empty());
    }
}
