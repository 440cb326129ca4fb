//! # Skirmish Core
//!
//! Two-agent combat simulation with online tabular Q-learning.
//!
//! Two square combatants share a bounded 2D arena. Every tick each one picks
//! a movement or fire action from its own policy table, projectiles fly and
//! collide, damage and rewards are settled, and both tables are updated from
//! what happened. The round ends when either combatant runs out of health.
//!
//! ## Architecture
//!
//! - **Entities**: [`CombatEntity`] with position, health, weapon cooldown
//!   and the projectiles it owns
//! - **Policies**: [`DecisionPolicy`] composing the learned epsilon-greedy
//!   choice with an optional scripted dodge
//! - **Resolvers**: projectile physics, then combat (hits, damage, rewards)
//! - **Simulation**: [`Simulation::step`] runs one atomic tick
//!
//! Rendering, input capture and the real-time loop belong to the host; it
//! calls `step` with a time delta and the current clock and draws the
//! returned [`TickResult`].
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{EpisodeRunner, SimConfig, Simulation};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let runner = EpisodeRunner { max_ticks: 100, ..EpisodeRunner::default() };
//! let summary = runner.run(&mut sim, &mut rng).unwrap();
//! assert!(summary.ticks <= 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the learning substrate
pub use qtable;

pub mod arena;
pub mod config;
pub mod entity;
pub mod episode;
pub mod error;
pub mod output;
pub mod policy;
pub mod projectile;
pub mod resolver;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use arena::{Arena, Rect};
pub use config::{ArenaConfig, EntityConfig, ProjectileConfig, SimConfig};
pub use entity::{CombatEntity, EntityId, MovementSource};
pub use episode::{EpisodeRunner, EpisodeSummary};
pub use error::{ConfigError, SimError};
pub use output::{AgentEvents, SimStatus, TickResult};
pub use policy::{Action, DecisionPolicy};
pub use simulation::{Simulation, TickInput};
