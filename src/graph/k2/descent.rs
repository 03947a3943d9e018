//! Rank-offset descent through `T` into `L`.
//!
//! A tree position `level` addresses `T` while `level < |T|` and `L` at
//! `level - |T|` afterwards. The children of a set position `p` start at
//! `rank1(T, p + 1) * K²`, which is what lets the tree live without child
//! pointers. The walk is iterative over an explicit frame stack bounded by the
//! tree height.

use super::view::K2View;
use crate::error::{K2Error, Result};

/// One quadrant under examination.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Quadrant {
    /// Position in the concatenated `T ++ L` address space.
    pub level: usize,
    /// Side length of this quadrant's children.
    pub side: usize,
    /// Row offset of the source vertex inside this quadrant.
    pub row: usize,
    /// Absolute column of this quadrant's left edge.
    pub col: usize,
    /// Depth below the root row-band, `0` for the band itself.
    pub depth: usize,
}

/// A set internal node whose children are being walked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    y: usize,
    side: usize,
    row: usize,
    col: usize,
    depth: usize,
    branch: usize,
}

impl Frame {
    #[inline(always)]
    fn child<const K: usize>(&self, branch: usize) -> Quadrant {
        Quadrant {
            level: self.y + branch,
            side: self.side / K,
            row: self.row % self.side,
            col: self.col + self.side * branch,
            depth: self.depth + 1,
        }
    }
}

enum Step {
    Hit,
    Miss,
    Descend { y: usize },
}

#[inline]
fn inspect<const K: usize>(view: &K2View<'_, '_>, quad: &Quadrant, leaf_depth: usize) -> Result<Step> {
    let t_len = view.internal_len();
    if quad.level >= t_len {
        if quad.depth != leaf_depth {
            return Err(K2Error::inconsistent(quad.level, "leaf layer reached above the deepest level"));
        }
        return match view.leaf_bit(quad.level - t_len) {
            Some(true) => Ok(Step::Hit),
            Some(false) => Ok(Step::Miss),
            None => Err(K2Error::inconsistent(quad.level, "leaf index past the end of L")),
        };
    }

    if quad.depth >= leaf_depth {
        return Err(K2Error::inconsistent(quad.level, "internal node at leaf depth"));
    }
    if view.internal_bit(quad.level) != Some(true) {
        // Empty quadrant: nothing below it is stored.
        return Ok(Step::Miss);
    }

    let y = view.rank_internal(quad.level + 1) * K * K + K * (quad.row / quad.side);
    Ok(Step::Descend { y })
}

/// Finds the first set leaf at or after the column lower bound in `path`.
///
/// `path[d]` is the branch digit taken below depth `d`. On entry it is the
/// lower bound for the search: the first path walked starts every level at its
/// digit, and any backtrack relaxes the remaining search to branch `0`. On a
/// hit `path` holds the digits of the returned column; on a miss it is left in
/// an unspecified state.
pub(crate) fn descend<const K: usize>(
    view: &K2View<'_, '_>,
    start: Quadrant,
    path: &mut [usize],
    frames: &mut Vec<Frame>,
) -> Result<Option<usize>> {
    let leaf_depth = usize::from(view.height()).saturating_sub(1);
    frames.clear();

    let mut quad = start;
    let mut tight = true;
    loop {
        match inspect::<K>(view, &quad, leaf_depth)? {
            Step::Hit => return Ok(Some(quad.col)),
            Step::Descend { y } => {
                let branch = if tight { path[quad.depth] } else { 0 };
                let frame = Frame {
                    y,
                    side: quad.side,
                    row: quad.row,
                    col: quad.col,
                    depth: quad.depth,
                    branch,
                };
                path[quad.depth] = branch;
                quad = frame.child::<K>(branch);
                frames.push(frame);
                continue;
            }
            Step::Miss => {}
        }

        loop {
            let Some(frame) = frames.last_mut() else {
                return Ok(None);
            };
            frame.branch += 1;
            if frame.branch < K {
                path[frame.depth] = frame.branch;
                quad = frame.child::<K>(frame.branch);
                tight = false;
                break;
            }
            frames.pop();
        }
    }
}

/// Tests the single matrix cell `(row, col)` of a `size x size` matrix.
pub(crate) fn locate<const K: usize>(view: &K2View<'_, '_>, size: usize, row: usize, col: usize) -> Result<bool> {
    if row >= size || col >= size || view.leaf_len() == 0 {
        return Ok(false);
    }
    let leaf_depth = usize::from(view.height()) - 1;
    let block = size / K;
    let mut col_rem = col % block;
    let mut quad = Quadrant {
        level: K * (row / block) + col / block,
        side: block / K,
        row: row % block,
        col: col - col_rem,
        depth: 0,
    };

    loop {
        match inspect::<K>(view, &quad, leaf_depth)? {
            Step::Hit => return Ok(true),
            Step::Miss => return Ok(false),
            Step::Descend { y } => {
                let branch = col_rem / quad.side;
                col_rem %= quad.side;
                let frame = Frame {
                    y,
                    side: quad.side,
                    row: quad.row,
                    col: quad.col,
                    depth: quad.depth,
                    branch,
                };
                quad = frame.child::<K>(branch);
            }
        }
    }
}
