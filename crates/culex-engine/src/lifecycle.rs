//! Site arrival and the per-agent lifecycle state machine.
//!
//! # States
//!
//! | `fed` | `timer` | State |
//! |-------|---------|-------|
//! | false | 0       | [`LifecycleState::SeekFood`] |
//! | true  | > 0     | [`LifecycleState::RefractoryFood`] |
//! | true  | 0       | [`LifecycleState::SeekBreed`] |
//! | false | > 0     | [`LifecycleState::RefractoryBreed`] |
//!
//! Only seeking agents are tested for arrival. A feeding arrival always
//! succeeds; a breeding arrival must also pass the density-gated
//! acceptance test, which reads a snapshot of the [`DensityGrid`] and
//! applies all increments in one batch afterwards so the outcome does not
//! depend on agent order.

use culex_core::{Environment, FieldError, Grid};
use rand::Rng;
use smallvec::SmallVec;

/// The four lifecycle states, derived from `(fed, timer)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Unfed, looking for a feeding site.
    SeekFood,
    /// Just fed; ignoring gradients until the timer runs out.
    RefractoryFood,
    /// Fed, looking for a breeding site.
    SeekBreed,
    /// Just bred; ignoring gradients until the timer runs out.
    RefractoryBreed,
}

impl LifecycleState {
    /// Classify an agent.
    pub fn of(fed: bool, timer: u32) -> Self {
        match (fed, timer) {
            (false, 0) => Self::SeekFood,
            (true, 0) => Self::SeekBreed,
            (true, _) => Self::RefractoryFood,
            (false, _) => Self::RefractoryBreed,
        }
    }

    /// Whether the agent follows a gradient and is tested for arrival.
    pub fn is_seeking(self) -> bool {
        matches!(self, Self::SeekFood | Self::SeekBreed)
    }
}

/// Decrement every positive timer of an active agent by one.
pub fn tick_timers(timers: &mut [u32], active: &[bool]) {
    for (t, _) in timers.iter_mut().zip(active).filter(|(_, a)| **a) {
        *t = t.saturating_sub(1);
    }
}

// ── DensityGrid ────────────────────────────────────────────────────

/// Per-cell counter of recent breeding successes.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityGrid {
    cells: Grid<f64>,
}

impl DensityGrid {
    /// An all-zero density grid of shape `(rows, cols)`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, FieldError> {
        Ok(Self {
            cells: Grid::filled(rows, cols, 0.0)?,
        })
    }

    /// Subtract `amount` from every cell, flooring at zero.
    pub fn decay(&mut self, amount: f64) {
        for v in self.cells.as_mut_slice() {
            *v = (*v - amount).max(0.0);
        }
    }

    /// Counter at linear index `idx`.
    pub fn get(&self, idx: usize) -> f64 {
        self.cells[idx]
    }

    /// Add one to the counter of every listed cell. A cell listed `k`
    /// times gains `k`.
    pub fn apply_increments(&mut self, cells: impl IntoIterator<Item = usize>) {
        let data = self.cells.as_mut_slice();
        for idx in cells {
            data[idx] += 1.0;
        }
    }

    /// Underlying grid.
    pub fn grid(&self) -> &Grid<f64> {
        &self.cells
    }

    /// Sum over all cells.
    pub fn total(&self) -> f64 {
        self.cells.as_slice().iter().sum()
    }

    /// Largest counter value.
    pub fn max(&self) -> f64 {
        self.cells.as_slice().iter().copied().fold(0.0, f64::max)
    }
}

// ── Arrival resolution ─────────────────────────────────────────────

/// Lifecycle parameters used during arrival resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrivalRules {
    /// Timer set on a successful feed.
    pub feed_refractory: u32,
    /// Timer set on a successful breed.
    pub breed_refractory: u32,
    /// `U ~ Uniform[acceptance_low, acceptance_high)`.
    pub acceptance_low: f64,
    /// See `acceptance_low`.
    pub acceptance_high: f64,
}

/// An accepted breeding visit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreedingEvent {
    /// Index of the parent within this step's arrays.
    pub parent: usize,
    /// Linear index of the breeding cell.
    pub cell: usize,
    /// Parent position at acceptance.
    pub position: [f64; 2],
}

/// Outcome of one arrival pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrivals {
    /// Agents that reached a feeding site this step.
    pub fed: Vec<usize>,
    /// Accepted breeding visits, in agent order.
    pub breeding: SmallVec<[BreedingEvent; 8]>,
    /// Breeding-site arrivals refused by the density gate.
    pub rejected: usize,
}

/// Resolve site arrivals for all agents flagged in `eligible`.
///
/// `eligible` must only contain agents that are alive after movement and
/// were seeking (timer 0) this step. Transitions are decided from the
/// pre-transition `fed` flags and a read-only view of `density`, then
/// written back in a second pass: flags and timers first, then one
/// batched increment per accepted visit.
#[allow(clippy::too_many_arguments)]
pub fn resolve_arrivals<R: Rng + ?Sized>(
    positions: &[[f64; 2]],
    fed: &mut [bool],
    timers: &mut [u32],
    eligible: &[bool],
    env: &Environment,
    density: &mut DensityGrid,
    rules: &ArrivalRules,
    rng: &mut R,
) -> Result<Arrivals, FieldError> {
    let mut arrivals = Arrivals::default();

    // Phase 1: decide, reading only.
    for (i, &pos) in positions.iter().enumerate() {
        if !eligible[i] {
            continue;
        }
        let [x, y] = pos;
        if fed[i] {
            let idx = env.breed().sites().cell_at(x, y)?;
            if !env.breed().is_site(idx) {
                continue;
            }
            let u = rng.gen_range(rules.acceptance_low..rules.acceptance_high);
            if density.get(idx) < u {
                arrivals.breeding.push(BreedingEvent {
                    parent: i,
                    cell: idx,
                    position: pos,
                });
            } else {
                log::trace!(
                    "breeding refused for agent {i} at cell {idx}: density {} >= {u}",
                    density.get(idx)
                );
                arrivals.rejected += 1;
            }
        } else {
            let idx = env.feed().sites().cell_at(x, y)?;
            if env.feed().is_site(idx) {
                arrivals.fed.push(i);
            }
        }
    }

    // Phase 2: write.
    for &i in &arrivals.fed {
        fed[i] = true;
        timers[i] = rules.feed_refractory;
    }
    for event in &arrivals.breeding {
        fed[event.parent] = false;
        timers[event.parent] = rules.breed_refractory;
    }
    density.apply_increments(arrivals.breeding.iter().map(|e| e.cell));

    Ok(arrivals)
}
