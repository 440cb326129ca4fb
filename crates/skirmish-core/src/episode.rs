//! Episode runner: drive a simulation to the end of a round.
//!
//! The runner feeds [`Simulation::step`] a nominal frame clock (`frame_dt`
//! per tick for projectile travel, `frame_ms` per tick for cooldowns) until
//! the round ends or `max_ticks` is reached.
//!
//! Batches of independently seeded episodes run in parallel with `rayon`.
//! Each episode owns its simulation and a `ChaCha8Rng` seeded from its seed,
//! so results match a sequential run and come back in seed order.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimConfig;
//! use skirmish_core::episode::EpisodeRunner;
//!
//! let runner = EpisodeRunner {
//!     max_ticks: 50,
//!     ..EpisodeRunner::default()
//! };
//! let summaries = runner.run_batch(&SimConfig::default(), &[1, 2, 3]).unwrap();
//!
//! assert_eq!(summaries.len(), 3);
//! assert_eq!(summaries[1].seed, Some(2));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimConfig;
use crate::entity::EntityId;
use crate::error::SimError;
use crate::output::SimStatus;
use crate::simulation::Simulation;

/// Outcome of one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Seed the episode ran with, when run from a batch.
    pub seed: Option<u64>,
    /// Ticks processed.
    pub ticks: u64,
    /// Final round status; `Running` if the tick limit was hit.
    pub status: SimStatus,
    /// Final health per entity.
    pub health: [u32; 2],
    /// Materialized policy-table rows per entity.
    pub visited_states: [usize; 2],
    /// Policy-table hashes per entity.
    pub table_hashes: [u64; 2],
}

impl EpisodeSummary {
    /// The winner, if the round ended in one.
    #[must_use]
    pub fn winner(&self) -> Option<EntityId> {
        match self.status {
            SimStatus::Terminated { winner } => Some(winner),
            SimStatus::Running | SimStatus::Aborted => None,
        }
    }
}

/// Drives simulations with a fixed frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRunner {
    /// Tick limit per episode.
    pub max_ticks: u64,
    /// `dt` passed to each step, in nominal frames.
    pub frame_dt: f32,
    /// Clock advance per tick, in milliseconds.
    pub frame_ms: f64,
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self {
            max_ticks: 20_000,
            frame_dt: 1.0,
            frame_ms: 1000.0 / 60.0,
        }
    }
}

impl EpisodeRunner {
    /// Steps `sim` until its round ends or `max_ticks` is reached.
    ///
    /// The clock continues from the time of the simulation's last tick.
    ///
    /// # Errors
    ///
    /// Propagates any [`SimError`] from a step; the round is then aborted.
    pub fn run<R: Rng + ?Sized>(
        &self,
        sim: &mut Simulation,
        rng: &mut R,
    ) -> Result<EpisodeSummary, SimError> {
        let mut now = sim.time();
        while sim.status().is_running() && sim.tick() < self.max_ticks {
            now += self.frame_ms;
            sim.step(self.frame_dt, now, rng)?;
        }
        Ok(Self::summarize(sim))
    }

    /// Runs one fresh episode per seed, in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error in seed order, from an invalid `config` or a
    /// failed step.
    pub fn run_batch(
        &self,
        config: &SimConfig,
        seeds: &[u64],
    ) -> Result<Vec<EpisodeSummary>, SimError> {
        seeds
            .par_iter()
            .map(|&seed| self.run_seeded(config, seed))
            .collect()
    }

    fn run_seeded(&self, config: &SimConfig, seed: u64) -> Result<EpisodeSummary, SimError> {
        let mut sim = Simulation::new(config.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut summary = self.run(&mut sim, &mut rng)?;
        summary.seed = Some(seed);
        info!(
            seed,
            ticks = summary.ticks,
            winner = ?summary.winner(),
            health = ?summary.health,
            visited = ?summary.visited_states,
            "episode finished"
        );
        Ok(summary)
    }

    fn summarize(sim: &Simulation) -> EpisodeSummary {
        EpisodeSummary {
            seed: None,
            ticks: sim.tick(),
            status: sim.status(),
            health: [
                sim.entity(EntityId::FIRST).health(),
                sim.entity(EntityId::SECOND).health(),
            ],
            visited_states: [
                sim.table(EntityId::FIRST).len(),
                sim.table(EntityId::SECOND).len(),
            ],
            table_hashes: [
                qtable::hash_table(sim.table(EntityId::FIRST)),
                qtable::hash_table(sim.table(EntityId::SECOND)),
            ],
        }
    }
}
