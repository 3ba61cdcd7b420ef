//! Row-major 2D grid storage.
//!
//! Agent positions and grid cells share one coordinate frame: position
//! `(x, y)` falls in cell `(row, col) = (floor(y), floor(x))`, whose linear
//! index is `row * cols + col`.

use crate::error::FieldError;

/// A dense `rows x cols` grid stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    ///
    /// Returns `Err(FieldError::EmptyGrid)` if either dimension is 0, or
    /// `Err(FieldError::LengthMismatch)` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, FieldError> {
        if rows == 0 || cols == 0 {
            return Err(FieldError::EmptyGrid);
        }
        let expected = rows * cols;
        if data.len() != expected {
            return Err(FieldError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, FieldError> {
        if rows == 0 || cols == 0 {
            return Err(FieldError::EmptyGrid);
        }
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows (the y extent).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (the x extent).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always returns `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Row-major cell data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major cell data.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Floor-truncated linear index of the cell containing `(x, y)`.
    ///
    /// The position must lie in `[0, cols) x [0, rows)`; anything else
    /// (including NaN) is a precondition violation reported as
    /// [`FieldError::OutOfDomain`].
    pub fn cell_at(&self, x: f64, y: f64) -> Result<usize, FieldError> {
        let in_domain =
            x >= 0.0 && y >= 0.0 && x < self.cols as f64 && y < self.rows as f64;
        if !in_domain {
            return Err(FieldError::OutOfDomain {
                x,
                y,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let row = y.floor() as usize;
        let col = x.floor() as usize;
        Ok(row * self.cols + col)
    }

    /// Check that `other` is co-registered with this grid.
    pub fn ensure_shape<U>(&self, other: &Grid<U>, what: &'static str) -> Result<(), FieldError> {
        if other.shape() != self.shape() {
            return Err(FieldError::ShapeMismatch {
                what,
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self, FieldError> {
        Self::new(rows, cols, vec![value; rows * cols])
    }
}

impl<T> std::ops::Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}
