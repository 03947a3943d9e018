//! Error types for k2 construction and traversal.

use core::fmt;

/// Errors surfaced by tree construction and edge enumeration.
///
/// An empty leaf sequence is not an error: enumeration simply starts at the
/// end sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum K2Error {
    /// `T`, `L` and the declared height disagree.
    ///
    /// `position` is the combined `T`/`L` level-order position whose read
    /// would have gone wrong.
    StructuralInconsistency {
        /// Position in the concatenated `T ++ L` address space.
        position: usize,
        /// What was wrong at that position.
        detail: &'static str,
    },
    /// The height is zero, or `k^height` does not fit in `usize`.
    InvalidHeight {
        /// The rejected height.
        height: u16,
    },
    /// An input edge lies outside the `size x size` matrix.
    EdgeOutOfBounds {
        /// Source vertex of the offending edge.
        row: usize,
        /// Target vertex of the offending edge.
        col: usize,
        /// Matrix side length.
        size: usize,
    },
}

impl K2Error {
    #[inline]
    pub(crate) const fn inconsistent(position: usize, detail: &'static str) -> Self {
        K2Error::StructuralInconsistency { position, detail }
    }
}

impl fmt::Display for K2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            K2Error::StructuralInconsistency { position, detail } => {
                write!(f, "structural inconsistency at position {position}: {detail}")
            }
            K2Error::InvalidHeight { height } => write!(f, "invalid k2-tree height {height}"),
            K2Error::EdgeOutOfBounds { row, col, size } => {
                write!(f, "edge ({row}, {col}) outside {size}x{size} matrix")
            }
        }
    }
}

impl std::error::Error for K2Error {}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, K2Error>;
