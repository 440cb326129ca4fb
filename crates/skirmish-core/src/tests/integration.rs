//! End-to-end tests of the tick pipeline.

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{EntityConfig, SimConfig};
use crate::entity::{EntityId, MovementSource};
use crate::episode::EpisodeRunner;
use crate::output::{AgentEvents, SimStatus};
use crate::policy::Action;
use crate::simulation::{Simulation, TickInput};

use super::helpers::{
    greedy_config, init_tracing, placed, prefer_fire, puppet_config, run_ticks, run_until,
    FRAME_MS,
};

// =============================================================================
// Combat
// =============================================================================

#[test]
fn projectile_hit_moves_reward_from_target_to_shooter() {
    let mut sim = placed(puppet_config(), Vec2::new(100.0, 300.0), Vec2::new(400.0, 300.0));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let fire = TickInput::default().with_action(EntityId::SECOND, Action::Fire);

    let (_, hit) = run_until(&mut sim, 600.0, fire, 60, &mut rng, |r| {
        r.entity(EntityId::FIRST).events.contains(AgentEvents::HIT_TAKEN)
    })
    .expect("shot should land");

    let target = hit.entity(EntityId::FIRST);
    let shooter = hit.entity(EntityId::SECOND);
    assert_eq!(target.health, 90);
    assert!((target.reward + 10.0).abs() < f64::EPSILON);
    assert!((shooter.reward - 10.0).abs() < f64::EPSILON);
    assert!(shooter.events.contains(AgentEvents::HIT_LANDED));
    assert!(shooter.projectiles.is_empty());
    assert_eq!(hit.status, SimStatus::Running);
}

#[test]
fn held_fire_respects_cooldown() {
    let mut sim = Simulation::new(puppet_config()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let fire = TickInput::default().with_action(EntityId::FIRST, Action::Fire);

    let mut fired = 0;
    let mut blocked = 0;
    let mut now = 0.0;
    while now < 1_100.0 {
        now += FRAME_MS;
        let result = sim.step_with_input(1.0, now, &fire, &mut rng).unwrap();
        let events = result.entity(EntityId::FIRST).events;
        if events.contains(AgentEvents::FIRED) {
            fired += 1;
        }
        if events.contains(AgentEvents::COOLDOWN_BLOCKED) {
            blocked += 1;
        }
    }

    // Fires at 512 and 1024
    assert_eq!(fired, 2);
    assert_eq!(fired + blocked, sim.tick());
}

#[test]
fn threat_overrides_learned_move() {
    let mut config = greedy_config();
    config.entities[0] = config.entities[0].with_movement(MovementSource::ExternalInput);
    let mut sim = placed(config, Vec2::new(100.0, 300.0), Vec2::new(500.0, 300.0));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let fire = TickInput::default().with_action(EntityId::FIRST, Action::Fire);

    let (before, dodged) = run_until(&mut sim, 600.0, fire, 60, &mut rng, |r| {
        r.entity(EntityId::SECOND).events.contains(AgentEvents::DODGED)
    })
    .expect("dodge should trigger");

    let dodger = dodged.entity(EntityId::SECOND);
    // The greedy MoveLeft is discarded; the step goes right and up, away
    // from a shot arriving from the left and below the top edge
    assert_eq!(dodger.action, Some(Action::MoveLeft));
    assert_eq!(
        dodger.position,
        before.entity(EntityId::SECOND).position + Vec2::new(5.0, -5.0)
    );
}

#[test]
fn fire_taken_under_threat_stands() {
    let mut config = greedy_config();
    config.entities[0] = config.entities[0].with_movement(MovementSource::ExternalInput);
    config.entities[1].fire_cooldown = 0.0;
    let mut sim = placed(config, Vec2::new(100.0, 300.0), Vec2::new(500.0, 300.0));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let fire = TickInput::default().with_action(EntityId::FIRST, Action::Fire);

    let mut previous = sim.snapshot();
    let mut dodged = None;
    for i in 0..60u32 {
        prefer_fire(&mut sim, EntityId::SECOND);
        let input = if i == 0 { fire } else { TickInput::default() };
        let now = 600.0 + f64::from(i) * FRAME_MS;
        let result = sim.step_with_input(1.0, now, &input, &mut rng).unwrap();
        if result.entity(EntityId::SECOND).events.contains(AgentEvents::DODGED) {
            dodged = Some((previous, result));
            break;
        }
        previous = result;
    }
    let (before, dodged) = dodged.expect("dodge should trigger");

    let dodger = dodged.entity(EntityId::SECOND);
    assert_eq!(dodger.action, Some(Action::Fire));
    assert!(dodger.events.contains(AgentEvents::FIRED));
    assert_eq!(
        dodger.position,
        before.entity(EntityId::SECOND).position + Vec2::new(5.0, -5.0)
    );
}

#[test]
fn scripted_entity_fires_but_only_the_script_moves_it() {
    let mut config = greedy_config();
    config.entities[1] =
        EntityConfig::at(Vec2::new(600.0, 250.0)).with_movement(MovementSource::Scripted);
    let mut sim = Simulation::new(config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    // Greedy MoveLeft is chosen and learned from, but only the center bias moves it
    let first = sim.step(1.0, 16.0, &mut rng).unwrap();
    let scripted = first.entity(EntityId::SECOND);
    assert_eq!(scripted.action, Some(Action::MoveLeft));
    assert_eq!(scripted.position, Vec2::new(570.0, 230.0));
    assert_eq!(sim.table(EntityId::SECOND).len(), 1);

    prefer_fire(&mut sim, EntityId::SECOND);
    let second = sim.step(1.0, 600.0, &mut rng).unwrap();
    let scripted = second.entity(EntityId::SECOND);
    assert_eq!(scripted.action, Some(Action::Fire));
    assert!(scripted.events.contains(AgentEvents::FIRED));
    assert_eq!(scripted.projectiles.len(), 1);
    assert_eq!(scripted.position, Vec2::new(565.0, 235.0));
}

#[test]
fn learned_entities_without_threats_drift_to_center() {
    let mut sim = Simulation::new(greedy_config()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let results = run_ticks(&mut sim, 0.0, 40, &mut rng);
    let last = results.last().unwrap();

    // Non-dodging greedy entity walks into the left wall
    assert_eq!(last.entity(EntityId::FIRST).position.x, 0.0);
    // Dodging entity settles where MoveLeft and the center bias cancel
    let center = last.entity(EntityId::SECOND).center;
    assert!((center.x - 400.0).abs() <= 5.0);
    assert!((center.y - 300.0).abs() <= 5.0);
}

// =============================================================================
// Rounds
// =============================================================================

#[test]
fn defeat_ends_round_and_reset_starts_another() {
    let mut sim = Simulation::new(puppet_config()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    sim.entity_mut(EntityId::SECOND).apply_damage(95);
    let arena = *sim.arena();
    sim.entity_mut(EntityId::FIRST).place(&arena, Vec2::new(100.0, 300.0));
    sim.entity_mut(EntityId::SECOND).place(&arena, Vec2::new(400.0, 300.0));
    let fire = TickInput::default().with_action(EntityId::FIRST, Action::Fire);

    let (_, last) = run_until(&mut sim, 600.0, fire, 60, &mut rng, |r| r.is_terminal())
        .expect("round should end");
    assert_eq!(last.winner(), Some(EntityId::FIRST));
    assert!(last
        .entity(EntityId::SECOND)
        .events
        .contains(AgentEvents::DEFEATED));

    let frozen = sim.step(1.0, 10_000.0, &mut rng).unwrap();
    assert_eq!(frozen.tick, last.tick);

    sim.reset(10_000.0);
    let next = sim.step(1.0, 10_016.0, &mut rng).unwrap();
    assert_eq!(next.tick, 1);
    assert_eq!(next.status, SimStatus::Running);
    assert_eq!(next.entity(EntityId::SECOND).health, 100);
}

#[test]
fn seeded_duel_terminates() {
    init_tracing();
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let summary = EpisodeRunner::default().run(&mut sim, &mut rng).unwrap();

    let Some(winner) = summary.winner() else {
        panic!("duel did not finish: {summary:?}");
    };
    let loser = winner.opponent();
    assert_eq!(summary.health[loser.index()], 0);
    assert!(summary.health[winner.index()] > 0 || winner == EntityId::FIRST);
    assert!(summary.visited_states.iter().all(|&n| n > 0));
}

// =============================================================================
// Properties
// =============================================================================

fn host_action(code: usize) -> Option<Action> {
    Action::from_id(code)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entities_stay_inside_arena(moves in prop::collection::vec((0usize..6, 0usize..6), 1..150)) {
        let mut sim = Simulation::new(puppet_config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let limit = sim.arena().size() - Vec2::splat(50.0);

        for (i, (a, b)) in moves.into_iter().enumerate() {
            let mut input = TickInput::default();
            if let Some(action) = host_action(a) {
                input = input.with_action(EntityId::FIRST, action);
            }
            if let Some(action) = host_action(b) {
                input = input.with_action(EntityId::SECOND, action);
            }
            #[allow(clippy::cast_precision_loss)]
            let now = (i + 1) as f64 * FRAME_MS;
            let result = sim.step_with_input(1.0, now, &input, &mut rng).unwrap();
            if result.is_terminal() {
                break;
            }
            for entity in &result.entities {
                prop_assert!(entity.position.cmpge(Vec2::ZERO).all());
                prop_assert!(entity.position.cmple(limit).all());
            }
        }
    }
}
