//! Test setup utilities.

use glam::Vec2;
use rand::Rng;

use crate::config::{EntityConfig, SimConfig};
use crate::entity::{EntityId, MovementSource};
use crate::output::TickResult;
use crate::policy::Action;
use crate::simulation::{Simulation, TickInput};

/// Milliseconds per nominal frame.
pub const FRAME_MS: f64 = 16.0;

// =============================================================================
// Configs
// =============================================================================

/// Default duel with exploration switched off.
pub fn greedy_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.learning = config.learning.with_exploration(0.0);
    config
}

/// Both entities driven by the host, so nothing moves or fires unprompted.
pub fn puppet_config() -> SimConfig {
    let mut config = greedy_config();
    for id in EntityId::ALL {
        let entity = &mut config.entities[id.index()];
        *entity = EntityConfig::at(entity.spawn_center).with_movement(MovementSource::ExternalInput);
    }
    config
}

/// Simulation built from `config` with both entities moved to the given
/// top-left corners.
pub fn placed(config: SimConfig, first: Vec2, second: Vec2) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    let arena = *sim.arena();
    sim.entity_mut(EntityId::FIRST).place(&arena, first);
    sim.entity_mut(EntityId::SECOND).place(&arena, second);
    sim
}

/// Makes `Fire` the greedy choice in the state `id` currently occupies.
pub fn prefer_fire(sim: &mut Simulation, id: EntityId) {
    let Some(state) = sim.arena().state_index(sim.entity(id).position()) else {
        return;
    };
    let table = sim.table_mut(id);
    while table.greedy(state) != Action::Fire.id() {
        table.update(state, Action::Fire.id(), 100.0, state);
    }
}

// =============================================================================
// Drivers
// =============================================================================

/// Steps `ticks` times on a [`FRAME_MS`] clock starting after `start`.
pub fn run_ticks<R: Rng>(
    sim: &mut Simulation,
    start: f64,
    ticks: u32,
    rng: &mut R,
) -> Vec<TickResult> {
    (1..=ticks)
        .map(|i| sim.step(1.0, start + f64::from(i) * FRAME_MS, rng).unwrap())
        .collect()
}

/// Steps with host `input` on the first tick and no input afterwards,
/// stopping at the first result matching `done` or after `limit` ticks.
pub fn run_until<R: Rng>(
    sim: &mut Simulation,
    start: f64,
    input: TickInput,
    limit: u32,
    rng: &mut R,
    done: impl Fn(&TickResult) -> bool,
) -> Option<(TickResult, TickResult)> {
    let mut previous = sim.snapshot();
    for i in 0..limit {
        let now = start + f64::from(i) * FRAME_MS;
        let input = if i == 0 { input } else { TickInput::default() };
        let result = sim.step_with_input(1.0, now, &input, rng).unwrap();
        if done(&result) {
            return Some((previous, result));
        }
        previous = result;
    }
    None
}

/// Installs a test-writer subscriber; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
