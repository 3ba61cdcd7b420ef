//! Environment fixtures for Culex development.
//!
//! Builders for the small synthetic environments the engine tests and
//! benchmarks run against: fields with sites everywhere or nowhere, fields
//! with a handful of point sites, and fields with a fixed gradient.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use culex_core::{Environment, Grid, SiteField};

/// Occupancy grid with sites at the listed `(row, col)` cells.
///
/// # Panics
///
/// If the shape is empty or a cell is out of range.
pub fn occupancy(rows: usize, cols: usize, cells: &[(usize, usize)]) -> Grid<i32> {
    let mut grid = Grid::filled(rows, cols, 0).expect("non-empty grid");
    for &(r, c) in cells {
        assert!(r < rows && c < cols, "site ({r}, {c}) outside {rows}x{cols}");
        grid.as_mut_slice()[r * cols + c] = 1;
    }
    grid
}

/// A site field that is a site on every cell (`on`) or on none.
///
/// Both cases have a zero gradient everywhere.
pub fn uniform_field(rows: usize, cols: usize, on: bool) -> SiteField {
    let sites = Grid::filled(rows, cols, i32::from(on)).expect("non-empty grid");
    SiteField::from_sites(sites).expect("uniform site field")
}

/// Environment whose feeding and breeding fields are each all-site or
/// site-free.
pub fn uniform_environment(rows: usize, cols: usize, feed_on: bool, breed_on: bool) -> Environment {
    Environment::new(
        uniform_field(rows, cols, feed_on),
        uniform_field(rows, cols, breed_on),
    )
    .expect("co-registered fields")
}

/// Environment with point sites at the listed `(row, col)` cells and
/// Euclidean distance gradients toward them.
pub fn point_sites_environment(
    rows: usize,
    cols: usize,
    feed_cells: &[(usize, usize)],
    breed_cells: &[(usize, usize)],
) -> Environment {
    let feed = SiteField::from_sites(occupancy(rows, cols, feed_cells)).expect("feed field");
    let breed = SiteField::from_sites(occupancy(rows, cols, breed_cells)).expect("breed field");
    Environment::new(feed, breed).expect("co-registered fields")
}

/// A site-free field whose gradient is `(gx, gy)` on every cell.
pub fn constant_gradient_field(rows: usize, cols: usize, gx: f64, gy: f64) -> SiteField {
    SiteField::new(
        Grid::filled(rows, cols, 0).expect("non-empty grid"),
        Grid::filled(rows, cols, gx).expect("non-empty grid"),
        Grid::filled(rows, cols, gy).expect("non-empty grid"),
    )
    .expect("constant field")
}

/// Environment with site-free fields and a fixed gradient on each.
pub fn constant_gradient_environment(
    rows: usize,
    cols: usize,
    feed_gradient: (f64, f64),
    breed_gradient: (f64, f64),
) -> Environment {
    Environment::new(
        constant_gradient_field(rows, cols, feed_gradient.0, feed_gradient.1),
        constant_gradient_field(rows, cols, breed_gradient.0, breed_gradient.1),
    )
    .expect("co-registered fields")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_marks_listed_cells() {
        let grid = occupancy(3, 4, &[(0, 0), (2, 3)]);
        assert_eq!(grid.as_slice().iter().sum::<i32>(), 2);
        assert_eq!(grid.get(2, 3), Some(&1));
    }

    #[test]
    fn point_site_gradient_points_at_site() {
        let env = point_sites_environment(10, 10, &[(5, 5)], &[]);
        let (gx, gy) = env.feed().gradient(5 * 10 + 1);
        assert!(gx > 0.0, "gx = {gx}");
        assert!(gy.abs() < 1e-12);
        assert_eq!(env.breed().site_count(), 0);
    }

    #[test]
    fn constant_environment_has_no_sites() {
        let env = constant_gradient_environment(4, 4, (1.0, 0.0), (0.0, -1.0));
        assert_eq!(env.feed().site_count(), 0);
        assert_eq!(env.breed().gradient(5), (0.0, -1.0));
    }
}
