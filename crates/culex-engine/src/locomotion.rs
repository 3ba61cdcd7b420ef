//! Turning and default locomotion.
//!
//! Headings follow an unbounded Gaussian random walk; they are never
//! wrapped to `[0, 2pi)`, and only pass through `cos`/`sin`. Speeds are drawn
//! fresh every step from a clamped normal distribution.

use rand::Rng;

/// Standard normal sample via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Add `N(0, sd^2)` drift to the heading of every agent flagged in `active`.
pub fn turn<R: Rng + ?Sized>(headings: &mut [f64], active: &[bool], sd: f64, rng: &mut R) {
    for (h, _) in headings.iter_mut().zip(active).filter(|(_, a)| **a) {
        *h += sd * standard_normal(rng);
    }
}

/// Per-agent speed `max(min, N(mean, sd^2))`.
///
/// Inactive agents get speed 0 and consume no randomness.
pub fn draw_speeds<R: Rng + ?Sized>(
    active: &[bool],
    mean: f64,
    sd: f64,
    min: f64,
    rng: &mut R,
) -> Vec<f64> {
    active
        .iter()
        .map(|&a| {
            if a {
                (mean + sd * standard_normal(rng)).max(min)
            } else {
                0.0
            }
        })
        .collect()
}

/// Displacement `speed * (cos h, sin h)`, zero for inactive agents.
pub fn displacement(headings: &[f64], speeds: &[f64], active: &[bool]) -> Vec<[f64; 2]> {
    headings
        .iter()
        .zip(speeds)
        .zip(active)
        .map(|((&h, &s), &a)| {
            if a {
                [s * h.cos(), s * h.sin()]
            } else {
                [0.0, 0.0]
            }
        })
        .collect()
}
