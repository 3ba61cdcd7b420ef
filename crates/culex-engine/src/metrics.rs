//! Per-step metrics for the population engine.
//!
//! [`StepMetrics`] captures phase timings and population counts for a
//! single step, for telemetry and profiling.

/// Timing and population metrics collected during a single step.
///
/// All durations are in microseconds. The engine populates these fields
/// after each `step()` call; the most recent value is also available from
/// `PopulationEngine::last_metrics()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Turning, speed draws, and locomotion displacement.
    pub locomotion_us: u64,
    /// Gradient lookups for seeking agents.
    pub seeking_us: u64,
    /// Arrival tests, state transitions, and density updates.
    pub arrival_us: u64,
    /// Offspring creation and trail recording.
    pub growth_us: u64,
    /// Agents in the arrays after the step, alive or dead.
    pub population: usize,
    /// Agents alive after movement (newborns not included).
    pub alive: usize,
    /// Successful feeding-site arrivals.
    pub fed_arrivals: usize,
    /// Breeding visits accepted by the density gate.
    pub breeding_accepted: usize,
    /// Breeding visits refused by the density gate.
    pub breeding_rejected: usize,
    /// Newborns appended.
    pub births: usize,
    /// Sum of the density grid after the step.
    pub density_total: f64,
}
