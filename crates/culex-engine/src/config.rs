//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the builder-input for [`PopulationEngine`](crate::PopulationEngine).
//! [`validate()`](EngineConfig::validate) checks every parameter against the
//! grid shape of the environment the engine will run on, so that the
//! in-bounds filter applied each step is sufficient to keep grid lookups
//! inside the grid domain.

use std::error::Error;
use std::f64::consts::FRAC_PI_2;
use std::fmt;

use culex_core::FieldError;

// ── Bounds ─────────────────────────────────────────────────────────

/// Axis-aligned arena rectangle.
///
/// Liveness uses the open interior: a position exactly on an edge is
/// outside the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Lower x bound.
    pub x_min: f64,
    /// Upper x bound.
    pub x_max: f64,
    /// Lower y bound.
    pub y_min: f64,
    /// Upper y bound.
    pub y_max: f64,
}

impl Bounds {
    /// A rectangle `[x_min, x_max] x [y_min, y_max]`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// The rectangle `[0, width] x [0, height]`.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    /// Whether `(x, y)` lies strictly inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(100.0, 100.0)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Bounds are non-finite or have non-positive extent.
    InvalidBounds {
        /// Description of the problem.
        reason: String,
    },
    /// The arena extends past the grid's coordinate domain
    /// `[0, cols] x [0, rows]`.
    ArenaOutsideGrid {
        /// The configured arena.
        bounds: Bounds,
        /// Grid `(rows, cols)`.
        grid: (usize, usize),
    },
    /// A numeric parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// The environment's grids are unusable.
    Field(FieldError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { reason } => write!(f, "invalid bounds: {reason}"),
            Self::ArenaOutsideGrid { bounds, grid } => write!(
                f,
                "arena [{}, {}] x [{}, {}] exceeds the {}x{} grid domain",
                bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max, grid.0, grid.1
            ),
            Self::InvalidParameter { name, reason } => write!(f, "{name}: {reason}"),
            Self::Field(e) => write!(f, "field: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a population engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Arena rectangle. Must lie inside the grid domain.
    pub bounds: Bounds,
    /// Number of agents spawned at construction (N0).
    pub initial_population: usize,
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Standard deviation of the per-step heading drift, in radians.
    pub turn_rate_sd: f64,
    /// Mean of the per-step speed draw.
    pub speed_mean: f64,
    /// Standard deviation of the per-step speed draw.
    pub speed_sd: f64,
    /// Lower clamp on the speed draw. Must be positive.
    pub min_speed: f64,
    /// Gradient-following weight is `speed * seek_gain`.
    pub seek_gain: f64,
    /// Agents with `age >= max_age` are dead.
    pub max_age: f64,
    /// Refractory steps after a successful feed.
    pub feed_refractory: u32,
    /// Refractory steps after a successful breed.
    pub breed_refractory: u32,
    /// Offspring appended per accepted breeding event.
    pub offspring_per_breeding: usize,
    /// Amount subtracted from every density cell each step (floor 0).
    pub density_decay: f64,
    /// Lower end of the breeding acceptance draw `U ~ Uniform[low, high)`.
    pub acceptance_low: f64,
    /// Upper end of the breeding acceptance draw.
    pub acceptance_high: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            initial_population: 100,
            seed: 0,
            turn_rate_sd: FRAC_PI_2,
            speed_mean: 1.0,
            speed_sd: 0.5,
            min_speed: 0.01,
            seek_gain: 1.0,
            max_age: 100.0,
            feed_refractory: 10,
            breed_refractory: 5,
            offspring_per_breeding: 3,
            density_decay: 0.1,
            acceptance_low: 1.0,
            acceptance_high: 10.0,
        }
    }
}

fn finite_at_least(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite and >= {min}, got {value}"),
        });
    }
    Ok(())
}

impl EngineConfig {
    /// Validate all parameters against a grid of shape `(rows, cols)`.
    pub fn validate(&self, grid: (usize, usize)) -> Result<(), ConfigError> {
        let (rows, cols) = grid;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::Field(FieldError::EmptyGrid));
        }

        // 1. Bounds are a proper rectangle.
        let b = &self.bounds;
        if ![b.x_min, b.x_max, b.y_min, b.y_max]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ConfigError::InvalidBounds {
                reason: "bounds must be finite".into(),
            });
        }
        if b.width() <= 0.0 || b.height() <= 0.0 {
            return Err(ConfigError::InvalidBounds {
                reason: format!("empty extent {}x{}", b.width(), b.height()),
            });
        }

        // 2. Every strictly-inside position floors to a valid cell.
        if b.x_min < 0.0 || b.y_min < 0.0 || b.x_max > cols as f64 || b.y_max > rows as f64 {
            return Err(ConfigError::ArenaOutsideGrid { bounds: *b, grid });
        }

        // 3. Movement parameters.
        finite_at_least("turn_rate_sd", self.turn_rate_sd, 0.0)?;
        finite_at_least("speed_sd", self.speed_sd, 0.0)?;
        if !self.speed_mean.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "speed_mean",
                reason: format!("must be finite, got {}", self.speed_mean),
            });
        }
        if !self.min_speed.is_finite() || self.min_speed <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "min_speed",
                reason: format!("must be finite and > 0, got {}", self.min_speed),
            });
        }
        finite_at_least("seek_gain", self.seek_gain, 0.0)?;

        // 4. Lifecycle parameters.
        if !self.max_age.is_finite() || self.max_age <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_age",
                reason: format!("must be finite and > 0, got {}", self.max_age),
            });
        }
        finite_at_least("density_decay", self.density_decay, 0.0)?;
        finite_at_least("acceptance_low", self.acceptance_low, 0.0)?;
        if !self.acceptance_high.is_finite() || self.acceptance_high <= self.acceptance_low {
            return Err(ConfigError::InvalidParameter {
                name: "acceptance_high",
                reason: format!(
                    "must be finite and > acceptance_low ({}), got {}",
                    self.acceptance_low, self.acceptance_high
                ),
            });
        }

        Ok(())
    }
}
