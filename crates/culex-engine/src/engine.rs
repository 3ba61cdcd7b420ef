//! The population engine: a single-threaded, step-driven simulation loop.
//!
//! [`PopulationEngine`] owns every per-agent column, the breeding density
//! grid, the trail buffer, and the RNG. Each [`step()`](PopulationEngine::step)
//! runs the phases below to completion before returning; no partial step is
//! ever observable.
//!
//! 1. Refractory timers of live agents tick down; the density grid decays.
//! 2. Liveness is evaluated on the pre-move state.
//! 3. Live agents turn, draw a speed, and take a locomotion step.
//! 4. Live agents with no refractory time left also follow the gradient of
//!    the site field they seek, read at their pre-move cell.
//! 5. Both displacements are applied together and live agents age by one.
//! 6. Liveness is re-evaluated on the post-move state.
//! 7. Seeking agents that are still alive are tested for site arrival.
//! 8. Accepted breeding visits append offspring, the trail is widened, and
//!    the new frame is recorded.
//! 9. Column lengths and trail width are verified.

use std::time::Instant;

use culex_core::{Environment, StepError, TickId, TrailColumn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use crate::config::{ConfigError, EngineConfig};
use crate::lifecycle::{resolve_arrivals, tick_timers, ArrivalRules, BreedingEvent, DensityGrid};
use crate::locomotion::{displacement, draw_speeds, turn};
use crate::metrics::StepMetrics;
use crate::population::{AgentSeed, Population};
use crate::reproduction::spawn_offspring;
use crate::seeking::seek_displacement;
use crate::snapshot::PopulationSnapshot;
use crate::trail::{TrailBuffer, TrailPoint};

// ── StepReport / StepResult ──────────────────────────────────────

/// What happened during one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Tick reached by this step.
    pub tick: TickId,
    /// Agents in the arrays after the step, alive or dead.
    pub population: usize,
    /// Pre-existing agents alive after movement.
    pub alive: usize,
    /// Indices of agents that fed this step.
    pub fed: Vec<usize>,
    /// Accepted breeding visits.
    pub breeding: SmallVec<[BreedingEvent; 8]>,
    /// Newborns appended.
    pub births: usize,
}

/// Result of a successful [`PopulationEngine::step()`] call.
#[derive(Debug)]
pub struct StepResult<'e> {
    /// Read-only view of the population after this step.
    pub snapshot: PopulationSnapshot<'e>,
    /// Events of this step.
    pub report: StepReport,
    /// Performance metrics for this step.
    pub metrics: StepMetrics,
}

/// Uniform draw from the open interval `(lo, hi)`; arena edges count as
/// outside, so a spawn exactly on `lo` would be dead at birth.
fn open_uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    loop {
        let v = rng.gen_range(lo..hi);
        if v > lo {
            return v;
        }
    }
}

fn micros(since: Instant) -> u64 {
    since.elapsed().as_micros() as u64
}

// ── PopulationEngine ─────────────────────────────────────────────

/// Owns the population and advances it one step at a time.
///
/// # Example
///
/// ```ignore
/// let mut engine = PopulationEngine::new(EngineConfig::default(), &env)?;
/// for _ in 0..200 {
///     let result = engine.step(&env)?;
///     render(result.snapshot.alive_positions());
/// }
/// ```
#[derive(Debug)]
pub struct PopulationEngine {
    config: EngineConfig,
    grid_shape: (usize, usize),
    population: Population,
    density: DensityGrid,
    trail: TrailBuffer,
    rng: ChaCha8Rng,
    current_tick: TickId,
    compacted: usize,
    last_metrics: StepMetrics,
}

impl PopulationEngine {
    /// Construct an engine with `config.initial_population` agents placed
    /// uniformly in the arena, with uniform headings in `[0, 2pi)`.
    ///
    /// Validates `config` against the environment's grid shape.
    pub fn new(config: EngineConfig, env: &Environment) -> Result<Self, ConfigError> {
        config.validate(env.shape())?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let b = config.bounds;
        let seeds = (0..config.initial_population)
            .map(|_| {
                let x = open_uniform(&mut rng, b.x_min, b.x_max);
                let y = open_uniform(&mut rng, b.y_min, b.y_max);
                let heading = rng.gen_range(0.0..std::f64::consts::TAU);
                AgentSeed::newborn([x, y], heading)
            })
            .collect();
        Self::assemble(config, env.shape(), seeds, rng)
    }

    /// Construct an engine from explicit agent states, ignoring
    /// `config.initial_population`.
    pub fn with_agents(
        config: EngineConfig,
        env: &Environment,
        agents: Vec<AgentSeed>,
    ) -> Result<Self, ConfigError> {
        config.validate(env.shape())?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::assemble(config, env.shape(), agents, rng)
    }

    fn assemble(
        config: EngineConfig,
        grid_shape: (usize, usize),
        agents: Vec<AgentSeed>,
        rng: ChaCha8Rng,
    ) -> Result<Self, ConfigError> {
        let density = DensityGrid::new(grid_shape.0, grid_shape.1)?;
        let mut population = Population::with_capacity(agents.len());
        let mut trail = TrailBuffer::new();
        let TrailColumn(first) = trail.widen(agents.len());
        for (offset, seed) in agents.into_iter().enumerate() {
            population.push(seed, TrailColumn(first + offset));
        }

        log::info!(
            "population engine ready: {} agents on a {}x{} grid, seed {}",
            population.len(),
            grid_shape.0,
            grid_shape.1,
            config.seed
        );

        let mut engine = Self {
            config,
            grid_shape,
            population,
            density,
            trail,
            rng,
            current_tick: TickId(0),
            compacted: 0,
            last_metrics: StepMetrics::default(),
        };
        engine.record_frame();
        Ok(engine)
    }

    /// Advance the simulation by one step.
    ///
    /// # Errors
    ///
    /// Every error is fatal. [`StepError::EnvironmentMismatch`] if `env`
    /// does not have the grid shape the engine was built for;
    /// [`StepError::Precondition`] if a grid lookup escaped the in-bounds
    /// filter; [`StepError::ShapeMismatch`] if the columns or the trail
    /// diverged in length.
    pub fn step(&mut self, env: &Environment) -> Result<StepResult<'_>, StepError> {
        if env.shape() != self.grid_shape {
            return Err(StepError::EnvironmentMismatch {
                expected: self.grid_shape,
                actual: env.shape(),
            });
        }
        let step_start = Instant::now();
        let mut metrics = StepMetrics::default();

        let Self {
            config,
            population,
            density,
            trail,
            rng,
            ..
        } = self;
        let bounds = config.bounds;

        // 1-3. Timers, density decay, turning and locomotion.
        let phase = Instant::now();
        let alive = population.alive_mask(&bounds, config.max_age);
        tick_timers(&mut population.timers, &alive);
        density.decay(config.density_decay);
        turn(&mut population.headings, &alive, config.turn_rate_sd, rng);
        let speeds = draw_speeds(
            &alive,
            config.speed_mean,
            config.speed_sd,
            config.min_speed,
            rng,
        );
        let walk = displacement(&population.headings, &speeds, &alive);
        metrics.locomotion_us = micros(phase);

        // 4. Gradient seeking from the pre-move cell.
        let phase = Instant::now();
        let seeking: Vec<bool> = alive
            .iter()
            .zip(&population.timers)
            .map(|(&a, &t)| a && t == 0)
            .collect();
        let weights: Vec<f64> = speeds.iter().map(|s| s * config.seek_gain).collect();
        let pull = seek_displacement(
            &population.positions,
            &population.fed,
            &weights,
            &seeking,
            env,
        )?;
        metrics.seeking_us = micros(phase);

        // 5. Move and age the live agents.
        for i in (0..population.len()).filter(|&i| alive[i]) {
            let [x, y] = &mut population.positions[i];
            *x += walk[i][0] + pull[i][0];
            *y += walk[i][1] + pull[i][1];
            population.ages[i] += 1.0;
        }

        // 6-7. Post-move liveness, then arrivals.
        let phase = Instant::now();
        let alive_after = population.alive_mask(&bounds, config.max_age);
        let eligible: Vec<bool> = alive_after
            .iter()
            .zip(&seeking)
            .map(|(&a, &s)| a && s)
            .collect();
        let rules = ArrivalRules {
            feed_refractory: config.feed_refractory,
            breed_refractory: config.breed_refractory,
            acceptance_low: config.acceptance_low,
            acceptance_high: config.acceptance_high,
        };
        let arrivals = resolve_arrivals(
            &population.positions,
            &mut population.fed,
            &mut population.timers,
            &eligible,
            env,
            density,
            &rules,
            rng,
        )?;
        metrics.arrival_us = micros(phase);

        // 8. Offspring, then the trail frame at full width.
        let phase = Instant::now();
        let k = config.offspring_per_breeding;
        let first = trail.widen(arrivals.breeding.len() * k);
        let births = spawn_offspring(population, &arrivals.breeding, k, first, rng);
        self.record_frame();
        metrics.growth_us = micros(phase);

        // 9. Invariants.
        self.check_invariants()?;
        self.current_tick = self.current_tick.next();

        let alive_count = alive_after.iter().filter(|&&a| a).count();
        metrics.population = self.population.len();
        metrics.alive = alive_count;
        metrics.fed_arrivals = arrivals.fed.len();
        metrics.breeding_accepted = arrivals.breeding.len();
        metrics.breeding_rejected = arrivals.rejected;
        metrics.births = births;
        metrics.density_total = self.density.total();
        metrics.total_us = micros(step_start);
        self.last_metrics = metrics.clone();

        log::debug!(
            "tick {}: population {}, alive {}, fed {}, bred {} (refused {}), born {}",
            self.current_tick,
            metrics.population,
            alive_count,
            metrics.fed_arrivals,
            metrics.breeding_accepted,
            metrics.breeding_rejected,
            births
        );

        Ok(StepResult {
            snapshot: self.snapshot(),
            report: StepReport {
                tick: self.current_tick,
                population: metrics.population,
                alive: alive_count,
                fed: arrivals.fed,
                breeding: arrivals.breeding,
                births,
            },
            metrics,
        })
    }

    /// Remove dead agents from the arrays, preserving the order of the
    /// survivors. Returns the number removed.
    ///
    /// Removed agents keep their trail columns; frames recorded after the
    /// compaction show those columns as absent. Array indices held from
    /// before the call are invalidated.
    pub fn compact(&mut self) -> usize {
        let keep = self
            .population
            .alive_mask(&self.config.bounds, self.config.max_age);
        let removed = keep.iter().filter(|&&k| !k).count();
        if removed > 0 {
            self.population.retain(&keep);
            self.compacted += removed;
            log::debug!(
                "compacted {removed} dead agents, {} remain",
                self.population.len()
            );
        }
        removed
    }

    /// Verify that every column matches the population length and that
    /// the trail has one column per agent ever created.
    pub fn check_invariants(&self) -> Result<(), StepError> {
        self.population.check_aligned()?;
        let expected = self.population.len() + self.compacted;
        if self.trail.width() != expected {
            return Err(StepError::ShapeMismatch {
                column: "trail",
                expected,
                actual: self.trail.width(),
            });
        }
        if let Some(bad) = self.trail.frames().find(|f| f.len() != expected) {
            return Err(StepError::ShapeMismatch {
                column: "trail_frame",
                expected,
                actual: bad.len(),
            });
        }
        Ok(())
    }

    fn record_frame(&mut self) {
        let pop = &self.population;
        self.trail.record(
            pop.columns
                .iter()
                .zip(&pop.positions)
                .zip(&pop.fed)
                .map(|((&column, &position), &fed)| (column, TrailPoint { position, fed })),
        );
    }

    /// Read-only view of the current population.
    pub fn snapshot(&self) -> PopulationSnapshot<'_> {
        PopulationSnapshot {
            tick: self.current_tick,
            population: &self.population,
            trail: &self.trail,
            bounds: self.config.bounds,
            max_age: self.config.max_age,
        }
    }

    /// The trail history.
    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// The breeding density grid.
    pub fn density(&self) -> &DensityGrid {
        &self.density
    }

    /// Number of completed steps.
    pub fn tick_id(&self) -> TickId {
        self.current_tick
    }

    /// Number of agents, alive or dead.
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Returns `true` if there are no agents.
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Number of live agents.
    pub fn alive_count(&self) -> usize {
        self.snapshot().alive_count()
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use culex_test_utils::uniform_environment;

    fn still_config() -> EngineConfig {
        EngineConfig {
            turn_rate_sd: 0.0,
            speed_sd: 0.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn new_spawns_inside_bounds() {
        let env = uniform_environment(100, 100, false, false);
        let engine = PopulationEngine::new(EngineConfig::default(), &env).unwrap();
        assert_eq!(engine.len(), 100);
        assert_eq!(engine.alive_count(), 100);
        assert_eq!(engine.trail().len(), 1);
        assert_eq!(engine.trail().width(), 100);
        assert_eq!(engine.tick_id(), TickId(0));
    }

    #[test]
    fn spawned_agents_are_alive_at_birth() {
        let env = uniform_environment(100, 100, false, false);
        for seed in 0..16 {
            let config = EngineConfig {
                seed,
                bounds: Bounds::new(10.0, 12.0, 40.0, 41.0),
                initial_population: 500,
                ..EngineConfig::default()
            };
            let engine = PopulationEngine::new(config, &env).unwrap();
            assert_eq!(engine.alive_count(), 500, "seed {seed}");
        }
    }

    #[test]
    fn open_uniform_stays_strictly_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..10_000 {
            let v = open_uniform(&mut rng, -1.0, 1.0);
            assert!(v > -1.0 && v < 1.0);
        }
    }

    #[test]
    fn agent_reaching_max_age_on_a_site_is_not_tested() {
        let env = uniform_environment(100, 100, true, true);
        let config = EngineConfig {
            max_age: 3.0,
            ..still_config()
        };
        let agents = vec![
            AgentSeed {
                age: 2.0,
                ..AgentSeed::newborn([50.5, 50.5], 0.0)
            },
            AgentSeed {
                age: 2.0,
                fed: true,
                ..AgentSeed::newborn([60.5, 60.5], 0.0)
            },
        ];
        let mut engine = PopulationEngine::with_agents(config, &env, agents).unwrap();
        let result = engine.step(&env).unwrap();
        assert!(result.report.fed.is_empty());
        assert!(result.report.breeding.is_empty());
        assert_eq!(result.report.alive, 0);
        assert_eq!(result.snapshot.fed(), &[false, true]);
        assert_eq!(result.snapshot.timers(), &[0, 0]);
        assert_eq!(result.snapshot.ages(), &[3.0, 3.0]);
        assert_eq!(engine.density().total(), 0.0);
    }

    #[test]
    fn new_rejects_arena_outside_grid() {
        let env = uniform_environment(10, 10, false, false);
        let err = PopulationEngine::new(EngineConfig::default(), &env).unwrap_err();
        assert!(matches!(err, ConfigError::ArenaOutsideGrid { .. }));
    }

    #[test]
    fn step_rejects_other_environment_shape() {
        let env = uniform_environment(100, 100, false, false);
        let other = uniform_environment(100, 120, false, false);
        let mut engine = PopulationEngine::new(EngineConfig::default(), &env).unwrap();
        let err = engine.step(&other).unwrap_err();
        assert!(matches!(err, StepError::EnvironmentMismatch { .. }));
        assert_eq!(engine.tick_id(), TickId(0));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let env = uniform_environment(100, 100, true, true);
        let run = || {
            let mut engine = PopulationEngine::new(EngineConfig::default(), &env).unwrap();
            for _ in 0..20 {
                engine.step(&env).unwrap();
            }
            engine.snapshot().positions().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn straight_line_motion_without_noise() {
        let env = uniform_environment(100, 100, false, false);
        let agent = AgentSeed::newborn([10.0, 50.0], 0.0);
        let mut engine = PopulationEngine::with_agents(still_config(), &env, vec![agent]).unwrap();
        for _ in 0..5 {
            engine.step(&env).unwrap();
        }
        let [x, y] = engine.snapshot().positions()[0];
        assert!((x - 15.0).abs() < 1e-9, "x = {x}");
        assert!((y - 50.0).abs() < 1e-9);
        assert_eq!(engine.snapshot().ages()[0], 5.0);
    }

    #[test]
    fn agent_walking_off_the_arena_freezes() {
        let env = uniform_environment(100, 100, false, false);
        let config = EngineConfig {
            bounds: Bounds::from_size(20.0, 20.0),
            ..still_config()
        };
        let agent = AgentSeed::newborn([18.5, 10.0], 0.0);
        let mut engine = PopulationEngine::with_agents(config, &env, vec![agent]).unwrap();
        engine.step(&env).unwrap(); // x = 19.5, alive
        engine.step(&env).unwrap(); // x = 20.5, dead
        let frozen = engine.snapshot().positions()[0];
        let age = engine.snapshot().ages()[0];
        for _ in 0..3 {
            engine.step(&env).unwrap();
        }
        assert_eq!(engine.snapshot().positions()[0], frozen);
        assert_eq!(engine.snapshot().ages()[0], age);
        assert_eq!(engine.alive_count(), 0);
    }

    #[test]
    fn max_age_kills() {
        let env = uniform_environment(100, 100, false, false);
        let config = EngineConfig {
            max_age: 3.0,
            speed_mean: 0.0,
            min_speed: 0.01,
            ..still_config()
        };
        let agent = AgentSeed::newborn([50.0, 50.0], 0.0);
        let mut engine = PopulationEngine::with_agents(config, &env, vec![agent]).unwrap();
        for _ in 0..3 {
            engine.step(&env).unwrap();
        }
        assert_eq!(engine.snapshot().ages()[0], 3.0);
        assert_eq!(engine.alive_count(), 0);
        engine.step(&env).unwrap();
        assert_eq!(engine.snapshot().ages()[0], 3.0);
    }

    #[test]
    fn compaction_keeps_trail_consistent() {
        let env = uniform_environment(100, 100, false, false);
        let agents = vec![
            AgentSeed::newborn([50.0, 50.0], 0.0),
            AgentSeed::newborn([-1.0, -1.0], 0.0),
            AgentSeed::newborn([60.0, 50.0], 0.0),
        ];
        let mut engine = PopulationEngine::with_agents(still_config(), &env, agents).unwrap();
        engine.step(&env).unwrap();
        assert_eq!(engine.compact(), 1);
        assert_eq!(engine.len(), 2);
        assert!(engine.check_invariants().is_ok());

        engine.step(&env).unwrap();
        let last = engine.trail().last_frame().unwrap();
        assert_eq!(last.len(), 3);
        assert!(last[0].is_some());
        assert!(last[1].is_none());
        assert!(last[2].is_some());
        assert_eq!(engine.compact(), 0);
    }

    #[test]
    fn metrics_are_retained() {
        let env = uniform_environment(100, 100, true, false);
        let mut engine = PopulationEngine::new(EngineConfig::default(), &env).unwrap();
        let metrics = engine.step(&env).unwrap().metrics;
        assert_eq!(engine.last_metrics(), &metrics);
        assert_eq!(metrics.population, 100);
        assert_eq!(metrics.births, 0);
    }
}
