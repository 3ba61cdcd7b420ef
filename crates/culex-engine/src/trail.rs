//! Historical agent positions for visualization.
//!
//! The buffer holds one frame per recorded step and one column per agent
//! ever born. Columns created after a frame was recorded are padded into
//! that frame as `None`, so every frame always has the current width and an
//! absent entry can never be mistaken for a coordinate.

use culex_core::TrailColumn;

/// One recorded agent state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    /// Position at the recorded step.
    pub position: [f64; 2],
    /// Fed flag at the recorded step.
    pub fed: bool,
}

/// Append-only history of agent states.
#[derive(Clone, Debug, Default)]
pub struct TrailBuffer {
    frames: Vec<Vec<Option<TrailPoint>>>,
    width: usize,
}

impl TrailBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns in every frame.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Allocate `extra` new columns, padding every existing frame with
    /// absent entries. Returns the first new column.
    pub(crate) fn widen(&mut self, extra: usize) -> TrailColumn {
        let first = TrailColumn(self.width);
        if extra == 0 {
            return first;
        }
        self.width += extra;
        for frame in &mut self.frames {
            frame.resize(self.width, None);
        }
        first
    }

    /// Record one frame. `points` yields `(column, point)` for every agent
    /// that should appear; all other columns are absent.
    pub(crate) fn record(&mut self, points: impl IntoIterator<Item = (TrailColumn, TrailPoint)>) {
        let mut frame = vec![None; self.width];
        for (TrailColumn(c), p) in points {
            if let Some(slot) = frame.get_mut(c) {
                *slot = Some(p);
            }
        }
        self.frames.push(frame);
    }

    /// Frame `t`, or `None` if it has not been recorded.
    pub fn frame(&self, t: usize) -> Option<&[Option<TrailPoint>]> {
        self.frames.get(t).map(|f| f.as_slice())
    }

    /// Most recently recorded frame.
    pub fn last_frame(&self) -> Option<&[Option<TrailPoint>]> {
        self.frames.last().map(|f| f.as_slice())
    }

    /// All frames, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &[Option<TrailPoint>]> {
        self.frames.iter().map(|f| f.as_slice())
    }

    /// The present points of one column, oldest first.
    pub fn path(&self, column: TrailColumn) -> Vec<TrailPoint> {
        self.frames
            .iter()
            .filter_map(|f| f.get(column.0).copied().flatten())
            .collect()
    }

    /// Check that every frame has the current width.
    pub fn is_rectangular(&self) -> bool {
        self.frames.iter().all(|f| f.len() == self.width)
    }
}
