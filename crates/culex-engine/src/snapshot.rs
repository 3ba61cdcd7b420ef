//! Read-only views of engine state.
//!
//! A [`PopulationSnapshot`] borrows from the engine, so the borrow checker
//! prevents stepping while a snapshot is held and prevents mutation
//! through it.

use culex_core::{TickId, TrailColumn};

use crate::config::Bounds;
use crate::lifecycle::LifecycleState;
use crate::population::Population;
use crate::trail::TrailBuffer;

/// Immutable view of the population after a step.
#[derive(Clone, Copy, Debug)]
pub struct PopulationSnapshot<'e> {
    pub(crate) tick: TickId,
    pub(crate) population: &'e Population,
    pub(crate) trail: &'e TrailBuffer,
    pub(crate) bounds: Bounds,
    pub(crate) max_age: f64,
}

impl<'e> PopulationSnapshot<'e> {
    /// Tick this snapshot was taken at.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Number of agents, alive or dead.
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Returns `true` if there are no agents.
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Positions, one `[x, y]` per agent.
    pub fn positions(&self) -> &'e [[f64; 2]] {
        self.population.positions()
    }

    /// Headings in radians.
    pub fn headings(&self) -> &'e [f64] {
        self.population.headings()
    }

    /// Ages in steps.
    pub fn ages(&self) -> &'e [f64] {
        self.population.ages()
    }

    /// Fed flags.
    pub fn fed(&self) -> &'e [bool] {
        self.population.fed()
    }

    /// Refractory timers.
    pub fn timers(&self) -> &'e [u32] {
        self.population.timers()
    }

    /// Trail column owned by each agent.
    pub fn trail_columns(&self) -> &'e [TrailColumn] {
        self.population.trail_columns()
    }

    /// Liveness of every agent.
    pub fn alive_mask(&self) -> Vec<bool> {
        self.population.alive_mask(&self.bounds, self.max_age)
    }

    /// Number of live agents.
    pub fn alive_count(&self) -> usize {
        self.alive_mask().into_iter().filter(|&a| a).count()
    }

    /// Positions of live agents only.
    pub fn alive_positions(&self) -> Vec<[f64; 2]> {
        self.positions()
            .iter()
            .zip(self.alive_mask())
            .filter_map(|(&p, a)| a.then_some(p))
            .collect()
    }

    /// Lifecycle state of every agent.
    pub fn states(&self) -> Vec<LifecycleState> {
        (0..self.len()).map(|i| self.population.state(i)).collect()
    }

    /// The trail history.
    pub fn trail(&self) -> &'e TrailBuffer {
        self.trail
    }
}
