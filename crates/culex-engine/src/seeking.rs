//! Gradient-biased goal seeking.
//!
//! Each seeking agent reads the gradient of the site field it is looking
//! for at its current cell and moves `weight * (grad_x, grad_y)`. Lookups
//! go through [`Grid::cell_at`](culex_core::Grid::cell_at); the engine only
//! marks agents as seeking once they are known to be inside the arena, and
//! the arena is validated to lie inside the grid domain, so a lookup error
//! here means that contract was broken.

use culex_core::{Environment, FieldError, SiteField, SiteKind};

/// Gradient displacement for every agent in `seeking`, zero elsewhere.
///
/// `weights[i]` scales agent `i`'s step. Fails with
/// [`FieldError::OutOfDomain`] if a seeking agent's position lies outside
/// the field's grid.
pub fn gradient_displacement(
    positions: &[[f64; 2]],
    field: &SiteField,
    weights: &[f64],
    seeking: &[bool],
) -> Result<Vec<[f64; 2]>, FieldError> {
    let grid = field.sites();
    positions
        .iter()
        .zip(weights)
        .zip(seeking)
        .map(|((&[x, y], &w), &s)| {
            if !s {
                return Ok([0.0, 0.0]);
            }
            let idx = grid.cell_at(x, y)?;
            let (gx, gy) = field.gradient(idx);
            Ok([w * gx, w * gy])
        })
        .collect()
}

/// Combined seeking displacement: unfed agents follow the feeding field,
/// fed agents the breeding field. The two are mutually exclusive per agent.
pub fn seek_displacement(
    positions: &[[f64; 2]],
    fed: &[bool],
    weights: &[f64],
    seeking: &[bool],
    env: &Environment,
) -> Result<Vec<[f64; 2]>, FieldError> {
    let wants = |kind: SiteKind| -> Vec<bool> {
        seeking
            .iter()
            .zip(fed)
            .map(|(&s, &f)| s && SiteKind::sought_by(f) == kind)
            .collect()
    };
    let feed = gradient_displacement(positions, env.feed(), weights, &wants(SiteKind::Feed))?;
    let breed = gradient_displacement(positions, env.breed(), weights, &wants(SiteKind::Breed))?;
    Ok(feed
        .into_iter()
        .zip(breed)
        .map(|(a, b)| [a[0] + b[0], a[1] + b[1]])
        .collect())
}
