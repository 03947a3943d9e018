//! The edge value emitted by enumeration.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A present edge `(row, col)` of the adjacency matrix.
///
/// `(size, size)` is reserved as the end sentinel; real coordinates are
/// always `< size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex.
    pub row: usize,
    /// Target vertex.
    pub col: usize,
}

impl Edge {
    /// Creates an edge.
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The end-of-iteration marker for a matrix of side `size`.
    #[inline(always)]
    pub const fn sentinel(size: usize) -> Self {
        Self {
            row: size,
            col: size,
        }
    }

    /// Returns `true` if this is the sentinel for a matrix of side `size`.
    #[inline(always)]
    pub const fn is_sentinel(&self, size: usize) -> bool {
        self.row == size && self.col == size
    }
}

impl From<(usize, usize)> for Edge {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Edge> for (usize, usize) {
    #[inline]
    fn from(edge: Edge) -> Self {
        (edge.row, edge.col)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
