//! Combat resolver for projectile hits, damage and rewards.
//!
//! For each entity, in id order, the first opposing projectile (spawn order)
//! overlapping its box is consumed. The entity loses `damage` health, its
//! reward for the tick drops by `hit_reward` and the shooter's rises by the
//! same amount. At most one hit per entity per tick is resolved; any other
//! overlapping projectiles stay in flight.
//!
//! Rewards are accumulated, so if both entities are hit in the same tick each
//! ends the tick at zero.

use tracing::debug;

use crate::entity::EntityId;
use crate::output::AgentEvents;

use super::{Resolver, TickFrame};

/// Resolver for projectile/entity collisions.
#[derive(Debug, Clone, Copy)]
pub struct CombatResolver {
    damage: u32,
    hit_reward: f64,
}

impl CombatResolver {
    /// Creates a resolver dealing `damage` per hit and moving `hit_reward`
    /// from target to shooter.
    #[must_use]
    pub fn new(damage: u32, hit_reward: f64) -> Self {
        Self { damage, hit_reward }
    }
}

impl Resolver for CombatResolver {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn resolve(&self, frame: &mut TickFrame<'_>) {
        for target in EntityId::ALL {
            let shooter = target.opponent();
            let body = frame.entities[target.index()].rect();

            let Some(projectile) = frame.entities[shooter.index()]
                .projectiles_mut()
                .take_first_hit(&body)
            else {
                continue;
            };

            let victim = &mut frame.entities[target.index()];
            victim.apply_damage(self.damage);
            let health = victim.health();

            let hurt = &mut frame.ledgers[target.index()];
            hurt.reward -= self.hit_reward;
            hurt.events |= AgentEvents::HIT_TAKEN;
            if health == 0 {
                hurt.events |= AgentEvents::DEFEATED;
            }

            let scorer = &mut frame.ledgers[shooter.index()];
            scorer.reward += self.hit_reward;
            scorer.events |= AgentEvents::HIT_LANDED;

            debug!(
                victim = %target,
                shooter = %shooter,
                projectile_id = projectile.id(),
                victim_health = health,
                "hit"
            );
        }
    }
}
