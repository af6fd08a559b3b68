//! Fire lifecycle: ignition, regrowth, suppression, burnout and spread

use approx::assert_relative_eq;
use hexfire_core::simulation::total_xp;
use hexfire_core::{
    FireEvent, FireSimulation, FireType, GameConfig, HexCoord, HexPatch, IgnitionCause, PathSpec,
    SimulationMode, SpreadRates, SuppressionOutcome,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config with ambient ignition and spread switched off
fn quiet_config() -> GameConfig {
    GameConfig {
        map_size: 8,
        ignition_probability: 0.0,
        spread: SpreadRates {
            normal_to_normal: 0.0,
            normal_to_path: 0.0,
            path_to_path: 0.0,
        },
        ..GameConfig::default()
    }
}

fn simulation(config: GameConfig) -> FireSimulation {
    FireSimulation::new(config, SimulationMode::Standard, 2024).unwrap()
}

/// Put a full-strength fire of `fire_type` on `hex`
fn full_fire(sim: &mut FireSimulation, hex: HexCoord, fire_type: FireType) {
    let extinguish_time = sim.config().fire_type(fire_type).unwrap().extinguish_time;
    sim.mutate(
        hex,
        HexPatch::new()
            .fire_type(Some(fire_type))
            .max_extinguish_time(extinguish_time)
            .extinguish_progress(extinguish_time)
            .burn_duration(0.0),
    );
}

#[test]
fn test_unsuppressed_flame_keeps_burning_at_full_strength() {
    let mut sim = simulation(GameConfig {
        map_size: 26,
        ..quiet_config()
    });
    let hex = HexCoord::new(2, -1);
    full_fire(&mut sim, hex, FireType::Flame);

    for tick in 1..=16 {
        sim.tick(1.0);
        let record = sim.get(hex).unwrap();
        assert!(record.is_burning(), "went out at tick {tick}");
        assert_eq!(record.extinguish_progress(), 15.0);
        assert!(record.extinguish_progress() <= record.max_extinguish_time());
    }

    let record = sim.get(hex).unwrap();
    assert_eq!(record.burn_duration(), 16.0);
    assert_eq!(record.fire_type(), Some(FireType::Flame));
}

#[test]
fn test_burnout_triggers_exactly_at_burnout_time() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(3, -2);
    full_fire(&mut sim, hex, FireType::Flame);

    for _ in 0..89 {
        sim.tick(1.0);
    }
    assert!(sim.get(hex).unwrap().is_burning());
    assert_eq!(sim.get(hex).unwrap().burn_duration(), 89.0);

    sim.tick(1.0);
    let record = sim.get(hex).unwrap();
    assert!(!record.is_burning());
    assert_eq!(record.burn_duration(), 0.0);
    assert_eq!(record.extinguish_progress(), 0.0);

    let events = sim.drain_events();
    assert_eq!(
        events,
        vec![FireEvent::BurnedOut {
            hex,
            fire_type: FireType::Flame
        }]
    );
    assert_eq!(total_xp(&events), 0);
}

#[test]
fn test_top_tier_never_burns_out() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(-5, 2);
    full_fire(&mut sim, hex, FireType::Cataclysm);

    for _ in 0..1000 {
        sim.tick(1.0);
    }
    let record = sim.get(hex).unwrap();
    assert!(record.is_burning());
    assert_eq!(record.burn_duration(), 1000.0);
    assert!(sim.events().is_empty());
}

#[test]
fn test_suppression_wins_before_burnout() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(4, 0);
    full_fire(&mut sim, hex, FireType::Flame);

    let mut ticks = 0;
    loop {
        match sim.suppress(hex, 1.0) {
            SuppressionOutcome::Suppressed { .. } => {
                sim.tick(1.0);
                ticks += 1;
            }
            SuppressionOutcome::Extinguished { fire_type, xp_reward } => {
                assert_eq!(fire_type, FireType::Flame);
                assert_eq!(xp_reward, 5);
                break;
            }
            SuppressionOutcome::NotBurning => panic!("fire vanished without an outcome"),
        }
    }
    // 15 seconds of effort, no regrowth in between
    assert_eq!(ticks, 14);

    let events = sim.drain_events();
    assert_eq!(total_xp(&events), 5);
    assert!(matches!(events.last(), Some(FireEvent::Extinguished { .. })));
}

#[test]
fn test_burnout_wins_against_weak_suppression() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(4, 0);
    full_fire(&mut sim, hex, FireType::Flame);

    for _ in 0..90 {
        sim.suppress(hex, 0.1);
        sim.tick(1.0);
    }
    assert!(!sim.get(hex).unwrap().is_burning());
    let events = sim.drain_events();
    assert!(matches!(events.as_slice(), [FireEvent::BurnedOut { .. }]));
}

#[test]
fn test_regrow_resumes_after_suppression_stops() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(0, 5);
    full_fire(&mut sim, hex, FireType::Inferno);

    sim.suppress(hex, 30.0);
    sim.tick(1.0);
    assert_relative_eq!(sim.get(hex).unwrap().extinguish_progress(), 30.0);

    // 5% of 60 per second
    sim.tick(2.0);
    assert_relative_eq!(sim.get(hex).unwrap().extinguish_progress(), 36.0);
}

#[test]
fn test_spread_follows_paths_only() {
    let mut config = quiet_config();
    config.spread.path_to_path = 1.0;
    let mut sim = simulation(config);

    let lane: Vec<HexCoord> = (2..=8).map(|q| HexCoord::new(q, -1)).collect();
    sim.set_path_hexes(&[PathSpec::new(lane.clone(), None)]);
    sim.ignite(lane[0], None);

    for _ in 0..lane.len() {
        sim.tick(1.0);
    }
    for hex in &lane {
        assert!(sim.get(*hex).unwrap().is_burning(), "({hex}) did not catch");
    }
    assert_eq!(sim.grid().get_burning().len(), lane.len());

    let spread_events = sim
        .events()
        .iter()
        .filter(|e| {
            matches!(
                e,
                FireEvent::Ignited {
                    cause: IgnitionCause::Spread { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(spread_events, lane.len() - 1);
}

#[test]
fn test_top_tier_doubles_spread_chance() {
    let mut config = quiet_config();
    config.spread.normal_to_normal = 0.5;
    let mut sim = simulation(config);

    let source = HexCoord::new(4, 0);
    full_fire(&mut sim, source, FireType::Cataclysm);
    sim.tick(1.0);

    for neighbor in source.neighbors() {
        assert!(sim.get(neighbor).unwrap().is_burning(), "({neighbor}) did not catch");
    }
}

#[test]
fn test_spread_ignites_at_lowest_tier_with_seed_progress() {
    let mut config = quiet_config();
    config.spread.normal_to_normal = 1.0;
    let mut sim = simulation(config);

    let source = HexCoord::new(-4, 0);
    full_fire(&mut sim, source, FireType::Hellfire);
    sim.tick(1.0);

    let neighbor = sim.get(HexCoord::new(-5, 0)).unwrap();
    assert_eq!(neighbor.fire_type(), Some(FireType::Flame));
    assert_eq!(neighbor.max_extinguish_time(), 15.0);
    assert_relative_eq!(neighbor.extinguish_progress(), 1.5);
    assert_eq!(neighbor.burn_duration(), 0.0);
}

#[test]
fn test_ambient_ignition_skips_town() {
    let mut config = quiet_config();
    config.ignition_probability = 1.0;
    let mut sim = simulation(config);

    let summary = sim.tick(1.0);
    assert_eq!(summary.ignited, sim.grid().len() - 7);
    assert!(!sim.is_town_on_fire());
    assert!(sim.events().iter().all(|e| matches!(
        e,
        FireEvent::Ignited {
            cause: IgnitionCause::Spontaneous,
            ..
        }
    )));
}

#[test]
fn test_clear_all_fires_resets_everything() {
    let mut config = quiet_config();
    config.ignition_probability = 1.0;
    let mut sim = simulation(config);
    sim.tick(1.0);
    sim.ignite(HexCoord::ORIGIN, Some(FireType::Blaze));
    let burning = sim.grid().get_burning().len();

    assert_eq!(sim.clear_all_fires(), burning);
    assert!(sim.grid().get_burning().is_empty());
    assert!(sim
        .grid()
        .get_all()
        .iter()
        .all(|r| r.burn_duration() == 0.0 && r.extinguish_progress() == 0.0));
}

#[test]
fn test_lowering_progress_through_mutate_skips_regrow() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(3, 0);
    sim.ignite(hex, Some(FireType::Blaze));
    sim.mutate(hex, HexPatch::new().extinguish_progress(20.0));
    sim.mutate(hex, HexPatch::new().extinguish_progress(16.0));

    sim.tick(1.0);
    assert_eq!(sim.get(hex).unwrap().extinguish_progress(), 16.0);
    assert_eq!(sim.get(hex).unwrap().burn_duration(), 1.0);

    // 5% of 25 per second once the tower stops
    sim.tick(1.0);
    assert_relative_eq!(sim.get(hex).unwrap().extinguish_progress(), 17.25);
}

#[test]
fn test_mutate_to_zero_goes_out_with_xp_on_next_tick() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(-3, 1);
    full_fire(&mut sim, hex, FireType::Blaze);
    sim.mutate(hex, HexPatch::new().extinguish_progress(0.0));
    assert!(sim.get(hex).unwrap().is_burning());

    let summary = sim.tick(1.0);
    assert_eq!(summary.extinguished, 1);
    assert!(!sim.get(hex).unwrap().is_burning());
    assert_eq!(
        sim.drain_events(),
        vec![FireEvent::Extinguished {
            hex,
            fire_type: FireType::Blaze,
            xp_reward: 10
        }]
    );
}

#[test]
fn test_bare_tier_assignment_seeds_fire() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(3, 0);
    sim.mutate(hex, HexPatch::new().fire_type(Some(FireType::Hellfire)));

    let record = sim.get(hex).unwrap();
    assert_eq!(record.max_extinguish_time(), 80.0);
    assert_relative_eq!(record.extinguish_progress(), 8.0);
    assert_eq!(record.burn_duration(), 0.0);

    let summary = sim.tick(1.0);
    assert_eq!(summary.extinguished, 0);
    assert!(sim.get(hex).unwrap().is_burning());
    assert_relative_eq!(sim.get(hex).unwrap().extinguish_progress(), 12.0);
    assert!(sim.events().is_empty());
}

#[test]
fn test_zero_progress_without_suppression_regrows() {
    let mut sim = simulation(quiet_config());
    let hex = HexCoord::new(0, -4);
    sim.mutate(
        hex,
        HexPatch::new()
            .fire_type(Some(FireType::Blaze))
            .max_extinguish_time(25.0)
            .extinguish_progress(0.0),
    );

    sim.tick(1.0);
    let record = sim.get(hex).unwrap();
    assert!(record.is_burning());
    assert_relative_eq!(record.extinguish_progress(), 1.25);
    assert_eq!(total_xp(sim.events()), 0);
}
