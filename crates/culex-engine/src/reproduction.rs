//! Offspring creation for accepted breeding visits.

use std::f64::consts::TAU;

use culex_core::TrailColumn;
use rand::Rng;

use crate::lifecycle::BreedingEvent;
use crate::population::{AgentSeed, Population};

/// Append `per_event` newborns for every event, at the parent's position,
/// with uniform headings in `[0, 2pi)`.
///
/// Newborns take consecutive trail columns starting at `first_column`.
/// Returns the number of agents appended.
pub fn spawn_offspring<R: Rng + ?Sized>(
    population: &mut Population,
    events: &[BreedingEvent],
    per_event: usize,
    first_column: TrailColumn,
    rng: &mut R,
) -> usize {
    let mut column = first_column.0;
    for event in events {
        for _ in 0..per_event {
            let heading = rng.gen_range(0.0..TAU);
            population.push(AgentSeed::newborn(event.position, heading), TrailColumn(column));
            column += 1;
        }
    }
    column - first_column.0
}
