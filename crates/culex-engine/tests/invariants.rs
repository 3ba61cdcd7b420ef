//! Integration test: step invariants over random seeds.
//!
//! Runs short simulations on a range of environments and checks, after
//! every step, the properties that must hold regardless of the random
//! draws: aligned columns, a rectangular trail, monotonic ages, timers
//! that only count down or reset, frozen dead agents, and a density grid
//! that drains once breeding stops.

use culex_engine::{DensityGrid, EngineConfig, LifecycleState, PopulationEngine};
use culex_test_utils::{point_sites_environment, uniform_environment};
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct Frame {
    positions: Vec<[f64; 2]>,
    ages: Vec<f64>,
    fed: Vec<bool>,
    timers: Vec<u32>,
    alive: Vec<bool>,
}

fn capture(engine: &PopulationEngine) -> Frame {
    let snap = engine.snapshot();
    Frame {
        positions: snap.positions().to_vec(),
        ages: snap.ages().to_vec(),
        fed: snap.fed().to_vec(),
        timers: snap.timers().to_vec(),
        alive: snap.alive_mask(),
    }
}

fn config(seed: u64, agents: usize) -> EngineConfig {
    EngineConfig {
        seed,
        initial_population: agents,
        ..EngineConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn step_invariants_hold(
        seed in any::<u64>(),
        agents in 0usize..60,
        steps in 1usize..40,
        feed_on in any::<bool>(),
        breed_on in any::<bool>(),
    ) {
        let env = uniform_environment(100, 100, feed_on, breed_on);
        let cfg = config(seed, agents);
        let mut engine = PopulationEngine::new(cfg.clone(), &env).unwrap();

        for _ in 0..steps {
            let before = capture(&engine);
            let result = engine.step(&env).unwrap();
            let snap = result.snapshot;

            // Columns and trail agree on the population size.
            prop_assert_eq!(snap.len(), before.positions.len() + result.report.births);
            prop_assert_eq!(snap.trail().width(), snap.len());
            prop_assert!(snap.trail().frames().all(|f| f.len() == snap.len()));
            prop_assert_eq!(
                result.report.births,
                result.report.breeding.len() * cfg.offspring_per_breeding
            );

            for i in 0..before.positions.len() {
                let age = snap.ages()[i];
                let timer = snap.timers()[i];
                if before.alive[i] {
                    prop_assert_eq!(age, before.ages[i] + 1.0);
                    let counted_down = timer == before.timers[i].saturating_sub(1);
                    let reset = timer == cfg.feed_refractory || timer == cfg.breed_refractory;
                    prop_assert!(counted_down || reset, "timer {} -> {}", before.timers[i], timer);
                } else {
                    prop_assert_eq!(snap.positions()[i], before.positions[i]);
                    prop_assert_eq!(age, before.ages[i]);
                    prop_assert_eq!(snap.fed()[i], before.fed[i]);
                    prop_assert_eq!(timer, before.timers[i]);
                }
                let state = LifecycleState::of(snap.fed()[i], timer);
                prop_assert_eq!(state.is_seeking(), timer == 0);
            }

            // Newborns start unfed, seeking, at age zero.
            let states = snap.states();
            for i in before.positions.len()..snap.len() {
                prop_assert_eq!(snap.ages()[i], 0.0);
                prop_assert_eq!(states[i], LifecycleState::SeekFood);
            }
        }
        prop_assert!(engine.check_invariants().is_ok());
    }

    #[test]
    fn point_site_runs_stay_consistent(
        seed in any::<u64>(),
        feed_row in 0usize..50,
        feed_col in 0usize..50,
        breed_row in 0usize..50,
        breed_col in 0usize..50,
    ) {
        let env = point_sites_environment(50, 50, &[(feed_row, feed_col)], &[(breed_row, breed_col)]);
        let cfg = EngineConfig {
            bounds: culex_engine::Bounds::from_size(50.0, 50.0),
            ..config(seed, 30)
        };
        let mut engine = PopulationEngine::new(cfg, &env).unwrap();
        let mut births = 0;
        for _ in 0..60 {
            births += engine.step(&env).unwrap().report.births;
        }
        prop_assert_eq!(engine.len(), 30 + births);
        prop_assert_eq!(engine.trail().len(), 61);

        let removed = engine.compact();
        prop_assert_eq!(engine.len() + removed, 30 + births);
        prop_assert_eq!(engine.alive_count(), engine.len());
        prop_assert!(engine.check_invariants().is_ok());
    }

    #[test]
    fn density_drains_to_zero(
        cells in prop::collection::vec(0usize..16, 0..40),
        decay in 0.05f64..2.0,
    ) {
        let mut density = DensityGrid::new(4, 4).unwrap();
        density.apply_increments(cells.iter().copied());
        prop_assert_eq!(density.total(), cells.len() as f64);

        let steps = (density.max() / decay).ceil() as usize + 1;
        for _ in 0..steps {
            let before = density.total();
            density.decay(decay);
            prop_assert!(density.total() <= before);
            prop_assert!(density.grid().as_slice().iter().all(|&v| v >= 0.0));
        }
        prop_assert_eq!(density.total(), 0.0);
    }
}
