//! Full-game scenarios driven through the public engine surface.

use hoops_core::api::demo_setup;
use hoops_core::config::EngineConfig;
use hoops_core::engine::{create_game_state, step_possession, GameSession, GameState};
use hoops_core::models::{LogType, PlayType, SimulationResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn play(seed: u64, pace: u8, intensity: u8) -> SimulationResult {
    let mut setup = demo_setup(seed);
    for tactics in [&mut setup.home_tactics, &mut setup.away_tactics] {
        tactics.sliders.pace = pace;
        tactics.sliders.def_intensity = intensity;
    }
    GameSession::new(&setup, EngineConfig::default()).unwrap().run_to_end().unwrap()
}

#[test]
fn fast_pace_means_more_transition_and_threes() {
    let (mut fast_transition, mut slow_transition) = (0, 0);
    let (mut fast_3pa, mut fast_fga, mut slow_3pa, mut slow_fga) = (0u32, 0u32, 0u32, 0u32);

    for seed in 0..8 {
        for (pace, intensity, transition, p3a, fga) in [
            (10, 10, &mut fast_transition, &mut fast_3pa, &mut fast_fga),
            (1, 1, &mut slow_transition, &mut slow_3pa, &mut slow_fga),
        ] {
            let result = play(seed, pace, intensity);
            *transition += result.shot_events.iter().filter(|s| s.play_type == PlayType::Transition).count();
            for row in result.home.players.iter().chain(&result.away.players) {
                *p3a += row.stats.p3a as u32;
                *fga += row.stats.fga as u32;
            }
        }
    }

    assert!(fast_transition > slow_transition * 2, "fast {fast_transition} vs slow {slow_transition}");
    let fast_share = fast_3pa as f64 / fast_fga as f64;
    let slow_share = slow_3pa as f64 / slow_fga as f64;
    assert!(fast_share > slow_share, "3PA share fast {fast_share:.3} vs slow {slow_share:.3}");
}

/// Step a whole game, calling `check` after every possession.
fn step_through(seed: u64, config: EngineConfig, mut check: impl FnMut(&GameState, &[hoops_core::models::PbpLog])) {
    let mut setup = demo_setup(seed);
    setup.home_tactics.sliders.def_intensity = 10;
    setup.away_tactics.sliders.def_intensity = 10;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = create_game_state(&setup, config, &mut rng).unwrap();
    for _ in 0..2_000 {
        let step = step_possession(&mut state, &mut rng).unwrap();
        assert_eq!(state.home.on_court.len(), 5);
        assert_eq!(state.away.on_court.len(), 5);
        check(&state, &step.new_logs);
        if step.is_game_end {
            return;
        }
    }
    panic!("seed {seed}: game never ended");
}

#[test]
fn fouled_out_players_never_return() {
    for seed in 0..10 {
        step_through(seed, EngineConfig::default(), |state, new_logs| {
            for team in [&state.home, &state.away] {
                assert!(team.on_court_players().all(|p| !p.fouled_out), "seed {seed}");
                assert!(team.players.iter().all(|p| p.stats.pf <= 6));
            }
            if let Some(pos) = new_logs.iter().position(|l| l.log_type == LogType::FoulOut) {
                assert!(
                    new_logs[pos..].iter().any(|l| l.log_type == LogType::Substitution),
                    "seed {seed}: foul-out without a forced substitution"
                );
            }
        });
    }
}

#[test]
fn shutdown_players_rest_until_recovered() {
    let mut config = EngineConfig::default();
    config.fatigue.base_drain_per_min = 9.0;
    let shutdown_return = config.fatigue.shutdown_return;
    let mut saw_shutdown = false;

    for seed in 0..4 {
        let mut was_shutdown: Vec<bool> = Vec::new();
        step_through(seed, config.clone(), |state, _| {
            let mut i = 0;
            for team in [&state.home, &state.away] {
                for (idx, p) in team.players.iter().enumerate() {
                    if i == was_shutdown.len() {
                        was_shutdown.push(false);
                    }
                    if was_shutdown[i] && !p.is_shutdown {
                        // A player cleared at a period break may already have played one possession.
                        let floor = if team.is_on_court(idx) { shutdown_return - 10.0 } else { shutdown_return };
                        assert!(p.condition > floor, "{} cleared at {:.1}", p.id, p.condition);
                    }
                    was_shutdown[i] = p.is_shutdown;
                    saw_shutdown |= p.is_shutdown;
                    i += 1;
                }

                let fresh_on_bench = team.bench.iter().any(|&b| team.players[b].is_available());
                for p in team.on_court_players().filter(|p| p.is_shutdown) {
                    assert!(!fresh_on_bench, "{} left on court while shut down", p.id);
                }
            }
        });
    }
    assert!(saw_shutdown, "drain never pushed anyone to the floor");
}

#[test]
fn tied_regulation_is_always_decided() {
    for seed in 0..12 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = create_game_state(&demo_setup(seed), EngineConfig::default(), &mut rng).unwrap();
        state.quarter = 4;
        state.game_clock = 1;
        state.home.score = 88;
        state.away.score = 88;

        let mut steps = 0;
        while !state.is_game_over {
            step_possession(&mut state, &mut rng).unwrap();
            steps += 1;
            assert!(steps <= 2, "seed {seed}: more than one extra possession");
        }
        assert_ne!(state.home.score, state.away.score, "seed {seed}");
        if state.went_to_tie_break {
            assert_eq!(state.quarter, 5);
        }
    }
}
