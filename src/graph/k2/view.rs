//! Read-only view of the pieces a k2-tree traversal needs.

use core::ptr;

use crate::bits::{BitVec, RankIndex};
use crate::error::{K2Error, Result};
use crate::token::{GhostToken, InvariantLifetime};

/// Borrowed `(T, L, rank(T), height)` of a k2 structure.
///
/// The view never owns or mutates the sequences, so any number of views and
/// iterators may read the same structure at once, from any thread.
#[derive(Debug, Clone, Copy)]
pub struct K2View<'a, 'brand> {
    internal: &'a BitVec,
    leaves: &'a BitVec,
    rank: &'a RankIndex,
    height: u16,
    _brand: InvariantLifetime<'brand>,
}

impl<'a, 'brand> K2View<'a, 'brand> {
    /// Wraps externally owned sequences without checking them against each other.
    ///
    /// `rank` must have been built over `internal`. Inconsistencies between the
    /// sequences and `height` surface later, as
    /// [`K2Error::StructuralInconsistency`] from the traversal that trips on them.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `rank` does not cover exactly `internal.len()`
    /// bits. Release builds skip the check and a mismatched `rank` yields wrong
    /// child offsets.
    pub fn from_parts(
        token: &GhostToken<'brand>,
        internal: &'a BitVec,
        leaves: &'a BitVec,
        rank: &'a RankIndex,
        height: u16,
    ) -> Self {
        Self::branded(token.brand(), internal, leaves, rank, height)
    }

    #[inline]
    pub(crate) fn branded(
        brand: InvariantLifetime<'brand>,
        internal: &'a BitVec,
        leaves: &'a BitVec,
        rank: &'a RankIndex,
        height: u16,
    ) -> Self {
        debug_assert_eq!(rank.len(), internal.len(), "rank index does not cover T");
        Self {
            internal,
            leaves,
            rank,
            height,
            _brand: brand,
        }
    }

    /// Number of levels below the root.
    #[inline(always)]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// `|T|`.
    #[inline(always)]
    pub fn internal_len(&self) -> usize {
        self.internal.len()
    }

    /// `|L|`.
    #[inline(always)]
    pub fn leaf_len(&self) -> usize {
        self.leaves.len()
    }

    /// `T[index]`, or `None` past the end.
    #[inline(always)]
    pub fn internal_bit(&self, index: usize) -> Option<bool> {
        self.internal.get(index)
    }

    /// `L[index]`, or `None` past the end.
    #[inline(always)]
    pub fn leaf_bit(&self, index: usize) -> Option<bool> {
        self.leaves.get(index)
    }

    /// Number of 1-bits in `T[0, index)`, for `index` in `[0, |T|]`.
    #[inline(always)]
    pub fn rank_internal(&self, index: usize) -> usize {
        self.rank.rank1(self.internal, index)
    }

    /// The internal sequence `T`.
    #[inline(always)]
    pub fn internal(&self) -> &'a BitVec {
        self.internal
    }

    /// The leaf sequence `L`.
    #[inline(always)]
    pub fn leaves(&self) -> &'a BitVec {
        self.leaves
    }

    /// Matrix side length `K^height`.
    pub fn size<const K: usize>(&self) -> Result<usize> {
        matrix_size::<K>(self.height)
    }

    /// Returns `true` if both views read the very same sequences.
    #[inline]
    pub fn same_source(&self, other: &Self) -> bool {
        ptr::eq(self.internal, other.internal) && ptr::eq(self.leaves, other.leaves)
    }
}

/// `K^height`, rejecting a zero height and overflow.
pub(crate) fn matrix_size<const K: usize>(height: u16) -> Result<usize> {
    if height == 0 {
        return Err(K2Error::InvalidHeight { height });
    }
    K.checked_pow(u32::from(height))
        .ok_or(K2Error::InvalidHeight { height })
}
