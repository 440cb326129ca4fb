//! Simulation module with the per-tick decide/act/resolve/learn loop.
//!
//! The `Simulation` struct owns both combatants, their policy tables and the
//! resolver pipeline. One call to [`Simulation::step`] runs one atomic tick:
//!
//! 1. **OBSERVE**: encode each entity's position as a state index
//! 2. **DECIDE**: each entity's [`DecisionPolicy`] picks an action
//! 3. **ACT**: moves are applied, then fires (aimed at the opponent's center)
//! 4. **DODGE**: the scripted dodge runs for entities that have it
//! 5. **RESOLVE**: projectile physics, then collisions, damage and rewards
//! 6. **LEARN**: one Q-learning update per acting entity
//! 7. **CHECK**: terminate if either entity's health reached zero
//!
//! # Determinism
//!
//! The random source is injected per call. Entities are always processed in
//! [`EntityId::ALL`] order, so the same seed, config, `dt` and time sequence
//! produce identical runs.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimConfig;
//! use skirmish_core::simulation::Simulation;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let mut now = 0.0;
//! for _ in 0..10 {
//!     now += 1000.0 / 60.0;
//!     sim.step(1.0, now, &mut rng).unwrap();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use qtable::{PolicyTable, StateIndex};
use rand::Rng;
use tracing::{debug, error, info};

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{CombatEntity, EntityId, FireOutcome, MoveOrigin};
use crate::error::{ConfigError, SimError};
use crate::output::{AgentEvents, AgentLedger, EntitySnapshot, SimStatus, TickResult};
use crate::policy::{Action, DecisionPolicy};
use crate::resolver::{default_pipeline, Resolver, TickFrame};

// =============================================================================
// TickInput
// =============================================================================

/// Host-supplied actions for externally controlled entities.
///
/// Entities whose movement source is not
/// [`ExternalInput`](crate::entity::MovementSource::ExternalInput) ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    actions: [Option<Action>; 2],
}

impl TickInput {
    /// Sets the action for `id`.
    #[must_use]
    pub fn with_action(mut self, id: EntityId, action: Action) -> Self {
        self.actions[id.index()] = Some(action);
        self
    }

    /// Action supplied for `id`, if any.
    #[must_use]
    pub fn action(&self, id: EntityId) -> Option<Action> {
        self.actions[id.index()]
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Learning state of one combatant.
#[derive(Debug, Clone)]
struct Agent {
    table: PolicyTable,
    policy: DecisionPolicy,
}

/// A two-entity learning duel.
///
/// Exclusively owns both [`CombatEntity`] instances and one [`PolicyTable`]
/// per entity. Tables survive [`Simulation::reset`], so agents keep adapting
/// across rounds.
pub struct Simulation {
    config: SimConfig,
    arena: Arena,
    entities: [CombatEntity; 2],
    agents: [Agent; 2],
    resolvers: Vec<Box<dyn Resolver>>,
    status: SimStatus,
    /// Ticks processed in the current round.
    tick: u64,
    /// Rounds started, including the current one.
    round: u64,
    /// Host time of the last processed tick.
    time: f64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("entities", &self.entities)
            .field("agents", &self.agents)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("status", &self.status)
            .field("tick", &self.tick)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation whose cooldown clock starts at time 0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::starting_at(config, 0.0)
    }

    /// Creates a simulation whose first round starts at host time `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn starting_at(config: SimConfig, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = Arena::from_config(&config.arena)?;
        let entities = EntityId::ALL.map(|id| CombatEntity::new(id, config.entity(id), &arena, now));
        let agents = [
            Self::agent(&config, EntityId::FIRST)?,
            Self::agent(&config, EntityId::SECOND)?,
        ];
        let resolvers = default_pipeline(config.projectile.damage, config.hit_reward);

        Ok(Self {
            config,
            arena,
            entities,
            agents,
            resolvers,
            status: SimStatus::Running,
            tick: 0,
            round: 1,
            time: now,
        })
    }

    fn agent(config: &SimConfig, id: EntityId) -> Result<Agent, ConfigError> {
        Ok(Agent {
            table: PolicyTable::new(config.learning)?,
            policy: DecisionPolicy::for_entity(config.entity(id), config.dodge_margin),
        })
    }

    /// Runs one tick with no host input.
    ///
    /// `dt` scales projectile travel (1.0 is one nominal frame); `now` is the
    /// host clock used for fire cooldowns.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::StateIndexOutOfRange`] if an entity position can
    /// no longer be encoded; the round is then aborted.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        rng: &mut R,
    ) -> Result<TickResult, SimError> {
        self.step_with_input(dt, now, &TickInput::default(), rng)
    }

    /// Runs one tick, taking actions for host-driven entities from `input`.
    ///
    /// Once the round is over this returns the final state unchanged.
    /// `dt` must be finite and non-negative and `now` finite; debug builds
    /// panic otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Simulation::step`].
    pub fn step_with_input<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        input: &TickInput,
        rng: &mut R,
    ) -> Result<TickResult, SimError> {
        debug_assert!(dt.is_finite() && dt >= 0.0, "invalid dt {dt}");
        debug_assert!(now.is_finite(), "invalid clock {now}");

        let mut ledgers = [AgentLedger::default(); 2];
        if !self.status.is_running() {
            return Ok(self.capture(&ledgers, self.time));
        }

        // OBSERVE
        let states = self.state_indices()?;

        // DECIDE
        let mut actions = [None; 2];
        for id in EntityId::ALL {
            let agent = &self.agents[id.index()];
            let action = agent
                .policy
                .decide(&agent.table, states[id.index()], input.action(id), rng);
            actions[id.index()] = action;
            ledgers[id.index()].action = action;
        }

        // ACT
        let before = [self.entities[0].position(), self.entities[1].position()];
        self.apply_moves(&actions);
        self.apply_fires(&actions, now, &mut ledgers);

        // DODGE
        self.apply_dodges(&actions, &before, &mut ledgers);

        // RESOLVE
        let mut frame = TickFrame {
            arena: &self.arena,
            entities: &mut self.entities,
            ledgers: &mut ledgers,
            dt,
        };
        for resolver in &self.resolvers {
            resolver.resolve(&mut frame);
        }

        // LEARN (both next states are checked before either table is touched)
        let next_states = self.state_indices()?;
        for id in EntityId::ALL {
            let i = id.index();
            if let Some(action) = actions[i] {
                self.agents[i]
                    .table
                    .update(states[i], action.id(), ledgers[i].reward, next_states[i]);
            }
        }

        self.tick += 1;
        self.time = now;

        // CHECK
        self.check_termination();

        Ok(self.capture(&ledgers, now))
    }

    fn apply_moves(&mut self, actions: &[Option<Action>; 2]) {
        for id in EntityId::ALL {
            let Some(action) = actions[id.index()].filter(|a| a.is_move()) else {
                continue;
            };
            let entity = &mut self.entities[id.index()];
            let origin = if entity.movement().is_external() {
                MoveOrigin::Host
            } else {
                MoveOrigin::Policy
            };
            let step = action.displacement();
            entity.move_by(&self.arena, origin, step.x, step.y);
        }
    }

    fn apply_fires(&mut self, actions: &[Option<Action>; 2], now: f64, ledgers: &mut [AgentLedger; 2]) {
        for id in EntityId::ALL {
            if actions[id.index()] != Some(Action::Fire) {
                continue;
            }
            let target = self.entities[id.opponent().index()].center();
            let outcome =
                self.entities[id.index()].try_fire(now, target, &self.config.projectile);
            match outcome {
                FireOutcome::Fired => ledgers[id.index()].events |= AgentEvents::FIRED,
                FireOutcome::CoolingDown => {
                    ledgers[id.index()].events |= AgentEvents::COOLDOWN_BLOCKED;
                }
                FireOutcome::Degenerate => {}
            }
        }
    }

    /// A threat overrides a learned move made this tick; a fire stands.
    fn apply_dodges(
        &mut self,
        actions: &[Option<Action>; 2],
        before: &[glam::Vec2; 2],
        ledgers: &mut [AgentLedger; 2],
    ) {
        for id in EntityId::ALL {
            let i = id.index();
            let Some(dodge) = self.agents[i].policy.dodge().copied() else {
                continue;
            };
            let plan = dodge.plan(
                &self.entities[i],
                &self.arena,
                self.entities[id.opponent().index()].projectiles().iter(),
            );

            let entity = &mut self.entities[i];
            if !entity.movement().accepts(MoveOrigin::Script) {
                continue;
            }
            if plan.is_evasive() {
                if actions[i].is_some_and(Action::is_move) {
                    entity.place(&self.arena, before[i]);
                }
                ledgers[i].events |= AgentEvents::DODGED;
                debug!(entity = %id, threat = ?plan.threat, step = ?plan.step, "dodge");
            }
            entity.move_by(&self.arena, MoveOrigin::Script, plan.step.x, plan.step.y);
        }
    }

    fn check_termination(&mut self) {
        let defeated = [self.entities[0].is_defeated(), self.entities[1].is_defeated()];
        let winner = match defeated {
            [false, false] => return,
            [true, false] => EntityId::SECOND,
            // Simultaneous defeat goes to the first entity
            [false, true] | [true, true] => EntityId::FIRST,
        };
        self.status = SimStatus::Terminated { winner };
        info!(
            %winner,
            round = self.round,
            tick = self.tick,
            health_first = self.entities[0].health(),
            health_second = self.entities[1].health(),
            "round over"
        );
    }

    /// State indices of both entities; aborts the round if either fails.
    fn state_indices(&mut self) -> Result<[StateIndex; 2], SimError> {
        let mut states = [0; 2];
        for id in EntityId::ALL {
            let position = self.entities[id.index()].position();
            let Some(state) = self.arena.state_index(position) else {
                let err = SimError::StateIndexOutOfRange {
                    entity: id,
                    position,
                };
                error!(%err, round = self.round, tick = self.tick, "aborting round");
                self.status = SimStatus::Aborted;
                return Err(err);
            };
            states[id.index()] = state;
        }
        Ok(states)
    }

    fn capture(&self, ledgers: &[AgentLedger; 2], time: f64) -> TickResult {
        TickResult {
            tick: self.tick,
            time,
            entities: [
                EntitySnapshot::capture(&self.entities[0], &ledgers[0]),
                EntitySnapshot::capture(&self.entities[1], &ledgers[1]),
            ],
            status: self.status,
        }
    }

    /// Starts a new round at host time `now`.
    ///
    /// Entities respawn with full health and no projectiles, the cooldown
    /// clock restarts at `now` and the tick counter returns to 0. Both policy
    /// tables are kept.
    pub fn reset(&mut self, now: f64) {
        for id in EntityId::ALL {
            self.entities[id.index()].respawn(self.config.entity(id), &self.arena, now);
        }
        self.status = SimStatus::Running;
        self.tick = 0;
        self.round += 1;
        self.time = now;
        debug!(round = self.round, "round reset");
    }

    /// Current state without per-tick accounting.
    #[must_use]
    pub fn snapshot(&self) -> TickResult {
        self.capture(&[AgentLedger::default(); 2], self.time)
    }

    /// Configuration this simulation was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Arena geometry.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// One combatant.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> &CombatEntity {
        &self.entities[id.index()]
    }

    /// Mutable access to one combatant.
    ///
    /// Use this for scenario setup between ticks; during play entities are
    /// only changed by `step`.
    pub fn entity_mut(&mut self, id: EntityId) -> &mut CombatEntity {
        &mut self.entities[id.index()]
    }

    /// Policy table of one combatant.
    #[must_use]
    pub fn table(&self, id: EntityId) -> &PolicyTable {
        &self.agents[id.index()].table
    }

    /// Mutable access to one combatant's policy table.
    ///
    /// Use this to warm-start a table between ticks.
    pub fn table_mut(&mut self, id: EntityId) -> &mut PolicyTable {
        &mut self.agents[id.index()].table
    }

    /// Decision policy of one combatant.
    #[must_use]
    pub fn policy(&self, id: EntityId) -> &DecisionPolicy {
        &self.agents[id.index()].policy
    }

    /// Round status.
    #[must_use]
    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// Ticks processed in the current round.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Host time of the last processed tick, or of the round start.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Rounds started so far, including the current one.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Adds a resolver after the default pipeline.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of resolvers in the pipeline.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Deterministic hash of round state and both policy tables.
    ///
    /// Floats are hashed by bit pattern; two runs from the same seed and
    /// inputs produce the same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.round.hash(&mut hasher);
        for entity in &self.entities {
            entity.position().x.to_bits().hash(&mut hasher);
            entity.position().y.to_bits().hash(&mut hasher);
            entity.health().hash(&mut hasher);
            for projectile in entity.projectiles().iter() {
                projectile.id().hash(&mut hasher);
                projectile.position().x.to_bits().hash(&mut hasher);
                projectile.position().y.to_bits().hash(&mut hasher);
            }
        }
        for agent in &self.agents {
            qtable::hash_table(&agent.table).hash(&mut hasher);
        }
        hasher.finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
