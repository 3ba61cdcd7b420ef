//! Benchmark profiles and utilities for the Culex population simulator.
//!
//! Provides pre-built engine profiles for benchmarking:
//!
//! - [`reference_profile`]: 100x100 grid, 100 agents, 16 feeding and 8 breeding sites
//! - [`stress_profile`]: 316x316 grid, 1000 agents, 64 feeding and 32 breeding sites
//! - [`scatter_sites`]: deterministic site placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use culex_core::Environment;
use culex_engine::{Bounds, EngineConfig};
use culex_test_utils::point_sites_environment;

/// Build a reference benchmark profile: 100x100 grid, 100 agents.
pub fn reference_profile(seed: u64) -> (EngineConfig, Environment) {
    profile(100, 100, 16, 8, seed)
}

/// Build a stress benchmark profile: 316x316 grid, 1000 agents.
///
/// Same parameters as [`reference_profile`] at ten times the area and
/// population.
pub fn stress_profile(seed: u64) -> (EngineConfig, Environment) {
    profile(316, 1000, 64, 32, seed)
}

fn profile(
    side: usize,
    agents: usize,
    feed_sites: usize,
    breed_sites: usize,
    seed: u64,
) -> (EngineConfig, Environment) {
    let feed = scatter_sites(side, side, feed_sites, seed);
    let breed = scatter_sites(side, side, breed_sites, seed.wrapping_add(1));
    let env = point_sites_environment(side, side, &feed, &breed);
    let config = EngineConfig {
        bounds: Bounds::from_size(side as f64, side as f64),
        initial_population: agents,
        seed,
        ..EngineConfig::default()
    };
    (config, env)
}

/// Generate `n` distinct `(row, col)` site cells.
///
/// Spreads sites across the grid using a simple hash of the seed, with a
/// linear probe to avoid collisions.
pub fn scatter_sites(rows: usize, cols: usize, n: usize, seed: u64) -> Vec<(usize, usize)> {
    let cell_count = rows * cols;
    let mut cells = Vec::with_capacity(n);
    let mut occupied = std::collections::HashSet::new();

    for i in 0..n.min(cell_count) {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add((i as u64).wrapping_mul(1442695040888963407))
            % cell_count as u64) as usize;
        while occupied.contains(&pos) {
            pos = (pos + 1) % cell_count;
        }
        occupied.insert(pos);
        cells.push((pos / cols, pos % cols));
    }

    cells
}
