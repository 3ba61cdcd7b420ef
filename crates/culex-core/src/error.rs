//! Error types for the Culex population simulator.
//!
//! Two families: [`FieldError`] for grid construction and lookups, and
//! [`StepError`] for invariant failures surfaced by the engine's `step()`.
//! Neither is recoverable: the core performs no I/O, so every error here
//! signals a programming mistake in the caller or a bug in the engine.

use std::error::Error;
use std::fmt;

/// Errors from grid construction and grid lookups.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// A grid was constructed with zero rows or zero columns.
    EmptyGrid,
    /// Backing storage does not hold exactly `rows * cols` cells.
    LengthMismatch {
        /// Expected number of cells (`rows * cols`).
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// Two grids that must be co-registered have different shapes.
    ShapeMismatch {
        /// Which grid was being checked (e.g. `"breed.grad_x"`).
        what: &'static str,
        /// Reference `(rows, cols)`.
        expected: (usize, usize),
        /// Offending `(rows, cols)`.
        actual: (usize, usize),
    },
    /// A lookup was attempted at a position outside the grid's
    /// coordinate domain.
    OutOfDomain {
        /// Queried x (column axis).
        x: f64,
        /// Queried y (row axis).
        y: f64,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "grid storage has {actual} cells, expected {expected}")
            }
            Self::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what} has shape {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::OutOfDomain { x, y, rows, cols } => write!(
                f,
                "position ({x}, {y}) lies outside the {rows}x{cols} grid domain"
            ),
        }
    }
}

impl Error for FieldError {}

/// Errors from the population engine during `step()`.
///
/// Every variant is fatal: the step that produced it must be treated as
/// a bug, and the engine state is no longer trustworthy.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A grid lookup was attempted at a position the engine should have
    /// filtered out beforehand.
    Precondition(FieldError),
    /// The environment passed to `step()` does not match the grid shape
    /// the engine was constructed against.
    EnvironmentMismatch {
        /// Shape the engine was built for.
        expected: (usize, usize),
        /// Shape of the environment supplied to this step.
        actual: (usize, usize),
    },
    /// A per-agent column or the trail buffer diverged in length.
    ShapeMismatch {
        /// Name of the offending column.
        column: &'static str,
        /// Population length the column should match.
        expected: usize,
        /// The column's actual length.
        actual: usize,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition(e) => write!(f, "precondition violated: {e}"),
            Self::EnvironmentMismatch { expected, actual } => write!(
                f,
                "environment is {}x{}, engine was built for {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::ShapeMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column '{column}' has length {actual}, population is {expected}"
            ),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Precondition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FieldError> for StepError {
    fn from(e: FieldError) -> Self {
        Self::Precondition(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_domain_display_names_position() {
        let e = FieldError::OutOfDomain {
            x: -1.0,
            y: 3.5,
            rows: 10,
            cols: 20,
        };
        let msg = e.to_string();
        assert!(msg.contains("(-1, 3.5)"), "{msg}");
        assert!(msg.contains("10x20"), "{msg}");
    }

    #[test]
    fn precondition_chains_source() {
        let e: StepError = FieldError::EmptyGrid.into();
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("precondition violated"));
    }

    #[test]
    fn shape_mismatch_has_no_source() {
        let e = StepError::ShapeMismatch {
            column: "ages",
            expected: 4,
            actual: 3,
        };
        assert!(e.source().is_none());
        assert_eq!(e.to_string(), "column 'ages' has length 3, population is 4");
    }
}
