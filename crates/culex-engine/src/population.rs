//! Columnar per-agent state.
//!
//! Every column has one entry per agent and index `i` refers to the same
//! agent in every column. Indices are only stable within one step: births
//! append at the end and [`Population::retain`] shifts survivors down.
//! Liveness is derived from position and age, never stored.

use culex_core::{StepError, TrailColumn};

use crate::config::Bounds;
use crate::lifecycle::LifecycleState;

/// Initial state for one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSeed {
    /// Position in arena units.
    pub position: [f64; 2],
    /// Heading in radians (unbounded).
    pub heading: f64,
    /// Steps since birth.
    pub age: f64,
    /// `false` = seeking food, `true` = seeking a breeding site.
    pub fed: bool,
    /// Remaining refractory steps.
    pub timer: u32,
}

impl AgentSeed {
    /// A newborn at `position`: unfed, age 0, timer 0.
    pub fn newborn(position: [f64; 2], heading: f64) -> Self {
        Self {
            position,
            heading,
            age: 0.0,
            fed: false,
            timer: 0,
        }
    }
}

/// Structure-of-arrays agent storage.
#[derive(Clone, Debug, Default)]
pub struct Population {
    pub(crate) positions: Vec<[f64; 2]>,
    pub(crate) headings: Vec<f64>,
    pub(crate) ages: Vec<f64>,
    pub(crate) fed: Vec<bool>,
    pub(crate) timers: Vec<u32>,
    pub(crate) columns: Vec<TrailColumn>,
}

impl Population {
    /// An empty population with room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            headings: Vec::with_capacity(capacity),
            ages: Vec::with_capacity(capacity),
            fed: Vec::with_capacity(capacity),
            timers: Vec::with_capacity(capacity),
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Number of agents, alive or dead.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no agents.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one agent to every column.
    pub(crate) fn push(&mut self, seed: AgentSeed, column: TrailColumn) {
        self.positions.push(seed.position);
        self.headings.push(seed.heading);
        self.ages.push(seed.age);
        self.fed.push(seed.fed);
        self.timers.push(seed.timer);
        self.columns.push(column);
    }

    /// Whether agent `i` is inside the arena and younger than `max_age`.
    pub fn is_alive(&self, i: usize, bounds: &Bounds, max_age: f64) -> bool {
        let [x, y] = self.positions[i];
        bounds.contains(x, y) && self.ages[i] < max_age
    }

    /// Liveness of every agent.
    pub fn alive_mask(&self, bounds: &Bounds, max_age: f64) -> Vec<bool> {
        (0..self.len())
            .map(|i| self.is_alive(i, bounds, max_age))
            .collect()
    }

    /// Lifecycle state of agent `i`.
    pub fn state(&self, i: usize) -> LifecycleState {
        LifecycleState::of(self.fed[i], self.timers[i])
    }

    /// Keep only agents whose `keep` entry is `true`, preserving order.
    pub(crate) fn retain(&mut self, keep: &[bool]) {
        fn retain_column<T>(column: &mut Vec<T>, keep: &[bool]) {
            let mut flags = keep.iter();
            column.retain(|_| flags.next().copied().unwrap_or(false));
        }
        retain_column(&mut self.positions, keep);
        retain_column(&mut self.headings, keep);
        retain_column(&mut self.ages, keep);
        retain_column(&mut self.fed, keep);
        retain_column(&mut self.timers, keep);
        retain_column(&mut self.columns, keep);
    }

    /// Check that every column has the same length.
    pub fn check_aligned(&self) -> Result<(), StepError> {
        let n = self.len();
        let lens = [
            ("headings", self.headings.len()),
            ("ages", self.ages.len()),
            ("fed", self.fed.len()),
            ("timers", self.timers.len()),
            ("trail_columns", self.columns.len()),
        ];
        for (column, actual) in lens {
            if actual != n {
                return Err(StepError::ShapeMismatch {
                    column,
                    expected: n,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Positions, one `[x, y]` per agent.
    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Headings in radians.
    pub fn headings(&self) -> &[f64] {
        &self.headings
    }

    /// Ages in steps.
    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    /// Fed flags.
    pub fn fed(&self) -> &[bool] {
        &self.fed
    }

    /// Refractory timers.
    pub fn timers(&self) -> &[u32] {
        &self.timers
    }

    /// Trail column owned by each agent.
    pub fn trail_columns(&self) -> &[TrailColumn] {
        &self.columns
    }
}
