//! Strongly-typed identifiers.

use std::fmt;

/// Monotonically increasing step counter.
///
/// `TickId(0)` is the state immediately after construction; each call to
/// `step()` advances it by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Column of the trail buffer owned by one agent.
///
/// Agent array indices are ephemeral: they are only meaningful within a
/// single step and shift when the population is compacted. The trail
/// column is assigned at birth and never changes, so renderers use it to
/// stitch an agent's path across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailColumn(pub usize);

impl fmt::Display for TrailColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for TrailColumn {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_next_increments() {
        assert_eq!(TickId(0).next(), TickId(1));
        assert_eq!(TickId(41).next().to_string(), "42");
    }

    #[test]
    fn trail_column_ordering() {
        assert!(TrailColumn(1) < TrailColumn(2));
        assert_eq!(TrailColumn::from(7), TrailColumn(7));
    }
}
