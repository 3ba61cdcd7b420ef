//! Site occupancy and gradient fields, and the co-registered [`Environment`].
//!
//! A [`SiteField`] describes one site type (feeding or breeding): an
//! occupancy grid where any nonzero cell is a site, plus x/y gradient grids
//! pointing toward the nearest site. The [`Environment`] pairs the two site
//! types over one grid shape and is read-only for the lifetime of a run.

use std::fmt;

use crate::error::FieldError;
use crate::grid::Grid;

/// The two kinds of site an agent can seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiteKind {
    /// Feeding sites, sought by unfed agents.
    Feed,
    /// Breeding sites, sought by fed agents.
    Breed,
}

impl SiteKind {
    /// Stable field name (`"feed"` or `"breed"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Breed => "breed",
        }
    }

    /// The site kind an agent with the given `fed` flag is looking for.
    pub fn sought_by(fed: bool) -> Self {
        if fed {
            Self::Breed
        } else {
            Self::Feed
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Occupancy plus gradient grids for one site type.
///
/// # Gradient convention
///
/// `grad_x[i]` and `grad_y[i]` give the direction of steepest *decrease*
/// in distance-to-nearest-site at cell `i`, in the same `(x = col,
/// y = row)` frame as agent positions. Adding `w * (grad_x, grad_y)` to a
/// position therefore moves it toward the nearest site.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteField {
    sites: Grid<i32>,
    grad_x: Grid<f64>,
    grad_y: Grid<f64>,
}

impl SiteField {
    /// Assemble a site field from precomputed grids.
    ///
    /// All three grids must share one shape.
    pub fn new(sites: Grid<i32>, grad_x: Grid<f64>, grad_y: Grid<f64>) -> Result<Self, FieldError> {
        sites.ensure_shape(&grad_x, "grad_x")?;
        sites.ensure_shape(&grad_y, "grad_y")?;
        Ok(Self {
            sites,
            grad_x,
            grad_y,
        })
    }

    /// Derive gradients from a distance-to-nearest-site map.
    ///
    /// Uses second-order central differences in the interior and
    /// first-order one-sided differences on the edges, then negates both
    /// components so the result points toward decreasing distance. An axis
    /// of length 1 has zero gradient along it.
    pub fn from_distance_map(sites: Grid<i32>, distance: &Grid<f64>) -> Result<Self, FieldError> {
        sites.ensure_shape(distance, "distance")?;
        let (rows, cols) = distance.shape();
        let d = distance.as_slice();

        let mut gx = vec![0.0f64; rows * cols];
        let mut gy = vec![0.0f64; rows * cols];

        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                gx[i] = -axis_derivative(c, cols, |k| d[r * cols + k]);
                gy[i] = -axis_derivative(r, rows, |k| d[k * cols + c]);
            }
        }

        Self::new(
            sites,
            Grid::new(rows, cols, gx)?,
            Grid::new(rows, cols, gy)?,
        )
    }

    /// Derive a Euclidean distance map from the occupancy grid, then the
    /// gradients from that map.
    ///
    /// Distances are measured between cell centres. A grid with no sites
    /// has a zero distance map and therefore a zero gradient everywhere.
    pub fn from_sites(sites: Grid<i32>) -> Result<Self, FieldError> {
        let (rows, cols) = sites.shape();
        let occupied: Vec<(f64, f64)> = sites
            .as_slice()
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, _)| ((i / cols) as f64, (i % cols) as f64))
            .collect();

        let distance = Grid::from_fn(rows, cols, |r, c| {
            occupied
                .iter()
                .map(|&(sr, sc)| {
                    let dr = sr - r as f64;
                    let dc = sc - c as f64;
                    (dr * dr + dc * dc).sqrt()
                })
                .fold(None, |best: Option<f64>, d| {
                    Some(best.map_or(d, |b| b.min(d)))
                })
                .unwrap_or(0.0)
        })?;

        Self::from_distance_map(sites, &distance)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.sites.shape()
    }

    /// Occupancy grid (nonzero = site present).
    pub fn sites(&self) -> &Grid<i32> {
        &self.sites
    }

    /// Gradient x component.
    pub fn grad_x(&self) -> &Grid<f64> {
        &self.grad_x
    }

    /// Gradient y component.
    pub fn grad_y(&self) -> &Grid<f64> {
        &self.grad_y
    }

    /// Whether the cell at linear index `idx` holds a site.
    pub fn is_site(&self, idx: usize) -> bool {
        self.sites[idx] != 0
    }

    /// Gradient `(x, y)` at linear index `idx`.
    pub fn gradient(&self, idx: usize) -> (f64, f64) {
        (self.grad_x[idx], self.grad_y[idx])
    }

    /// Number of site cells.
    pub fn site_count(&self) -> usize {
        self.sites.as_slice().iter().filter(|&&v| v != 0).count()
    }
}

/// Finite-difference derivative of a 1D sequence at position `k`.
fn axis_derivative(k: usize, len: usize, at: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if k == 0 {
        at(1) - at(0)
    } else if k == len - 1 {
        at(len - 1) - at(len - 2)
    } else {
        (at(k + 1) - at(k - 1)) / 2.0
    }
}

/// The feeding and breeding site fields over one shared grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    feed: SiteField,
    breed: SiteField,
}

impl Environment {
    /// Pair a feeding and a breeding field. Both must share one shape.
    pub fn new(feed: SiteField, breed: SiteField) -> Result<Self, FieldError> {
        if feed.shape() != breed.shape() {
            return Err(FieldError::ShapeMismatch {
                what: "breed",
                expected: feed.shape(),
                actual: breed.shape(),
            });
        }
        Ok(Self { feed, breed })
    }

    /// `(rows, cols)` shared by both fields.
    pub fn shape(&self) -> (usize, usize) {
        self.feed.shape()
    }

    /// The field for a site kind.
    pub fn site(&self, kind: SiteKind) -> &SiteField {
        match kind {
            SiteKind::Feed => &self.feed,
            SiteKind::Breed => &self.breed,
        }
    }

    /// Feeding sites.
    pub fn feed(&self) -> &SiteField {
        &self.feed
    }

    /// Breeding sites.
    pub fn breed(&self) -> &SiteField {
        &self.breed
    }
}
