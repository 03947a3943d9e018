//! Succinct k2-tree adjacency matrix.
//!
//! The `size x size` matrix (`size = K^height`) is cut into `K x K` blocks,
//! recursively. Every block is one bit in level order: `1` if anything inside
//! it is set, `0` if the whole block is empty, in which case nothing below it
//! is stored. All levels but the last form the internal sequence `T`; the last
//! level forms the leaf sequence `L` and holds the matrix cells themselves.
//!
//! ```text
//! K = 2, height = 2, edges {(0,1), (1,3), (3,0)}
//!
//!   0 1 | 0 0        T = 1 1 1 0
//!   0 0 | 0 1        L = 0100 0001 0010
//!   ----+----
//!   0 0 | 0 0
//!   1 0 | 0 0
//! ```
//!
//! Edges are enumerated lazily by [`EdgeIter`], which walks `T` and `L`
//! through the rank index and resumes where the previous step stopped.

use serde::{Deserialize, Serialize};

use crate::bits::{BitVec, RankIndex};
use crate::error::{K2Error, Result};
use crate::token::{GhostToken, InvariantLifetime};

pub use edge::Edge;
pub use iter::{EdgeIter, Neighbors};
pub use view::K2View;

use view::matrix_size;

/// Owned, serde-friendly form of a k2-tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct K2Parts {
    /// Number of levels.
    pub height: u16,
    /// The internal sequence `T`.
    pub internal: BitVec,
    /// The leaf sequence `L`.
    pub leaves: BitVec,
}

/// A k2-tree over a `K^height`-sided adjacency matrix.
#[derive(Debug, Clone)]
pub struct K2Tree<'brand, const K: usize> {
    internal: BitVec,
    leaves: BitVec,
    rank: RankIndex,
    height: u16,
    size: usize,
    edge_count: usize,
    brand: InvariantLifetime<'brand>,
}

impl<'brand, const K: usize> K2Tree<'brand, K> {
    const ARITY_OK: () = assert!(K >= 2, "k2-tree arity must be at least 2");

    /// Builds the smallest tree able to hold `vertices` vertices.
    ///
    /// Duplicate edges collapse into one.
    pub fn from_edges(token: &GhostToken<'brand>, vertices: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let () = Self::ARITY_OK;
        let mut height: u16 = 1;
        let mut size = K;
        while size < vertices {
            height = height.checked_add(1).ok_or(K2Error::InvalidHeight { height })?;
            size = size.checked_mul(K).ok_or(K2Error::InvalidHeight { height })?;
        }
        Self::with_height(token, height, edges)
    }

    /// Builds a tree from an adjacency list: `adjacency[u]` holds the targets of `u`.
    pub fn from_adjacency(token: &GhostToken<'brand>, adjacency: &[Vec<usize>]) -> Result<Self> {
        let edges: Vec<(usize, usize)> = adjacency
            .iter()
            .enumerate()
            .flat_map(|(row, targets)| targets.iter().map(move |&col| (row, col)))
            .collect();
        let vertices = edges
            .iter()
            .map(|&(row, col)| row.max(col) + 1)
            .max()
            .unwrap_or(0)
            .max(adjacency.len());
        Self::from_edges(token, vertices, &edges)
    }

    /// Builds a tree with an explicit height.
    pub fn with_height(token: &GhostToken<'brand>, height: u16, edges: &[(usize, usize)]) -> Result<Self> {
        let () = Self::ARITY_OK;
        let size = matrix_size::<K>(height)?;

        let mut cells = Vec::with_capacity(edges.len());
        for &(row, col) in edges {
            if row >= size || col >= size {
                return Err(K2Error::EdgeOutOfBounds { row, col, size });
            }
            cells.push(Edge::new(row, col));
        }
        cells.sort_unstable();
        cells.dedup();

        let (internal, leaves) = build_levels::<K>(size, height, cells);
        Ok(Self::assemble(token.brand(), height, size, internal, leaves))
    }

    /// Rebuilds a tree from its parts, checking the level shape.
    pub fn from_parts(token: &GhostToken<'brand>, parts: K2Parts) -> Result<Self> {
        let () = Self::ARITY_OK;
        let K2Parts {
            height,
            internal,
            leaves,
        } = parts;
        let size = matrix_size::<K>(height)?;
        let rank = RankIndex::new(&internal);
        validate_shape::<K>(height, &internal, &leaves, &rank)?;

        let edge_count = leaves.count_ones();
        Ok(Self {
            internal,
            leaves,
            rank,
            height,
            size,
            edge_count,
            brand: token.brand(),
        })
    }

    fn assemble(brand: InvariantLifetime<'brand>, height: u16, size: usize, internal: BitVec, leaves: BitVec) -> Self {
        let rank = RankIndex::new(&internal);
        let edge_count = leaves.count_ones();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            k = K,
            height,
            internal_bits = internal.len(),
            leaf_bits = leaves.len(),
            edge_count,
            "built k2-tree"
        );

        Self {
            internal,
            leaves,
            rank,
            height,
            size,
            edge_count,
            brand,
        }
    }

    /// Copies the tree out into its parts.
    pub fn parts(&self) -> K2Parts {
        K2Parts {
            height: self.height,
            internal: self.internal.clone(),
            leaves: self.leaves.clone(),
        }
    }

    /// Number of levels.
    #[inline(always)]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Matrix side length `K^height`.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of edges, i.e. 1-bits in `L`.
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// The internal sequence `T`.
    #[inline(always)]
    pub fn internal_bits(&self) -> &BitVec {
        &self.internal
    }

    /// The leaf sequence `L`.
    #[inline(always)]
    pub fn leaf_bits(&self) -> &BitVec {
        &self.leaves
    }

    /// Borrowed view for traversal.
    #[inline]
    pub fn view(&self) -> K2View<'_, 'brand> {
        K2View::branded(self.brand, &self.internal, &self.leaves, &self.rank, self.height)
    }

    /// Checks a single cell. Coordinates outside the matrix are never edges.
    pub fn has_edge(&self, row: usize, col: usize) -> Result<bool> {
        descent::locate::<K>(&self.view(), self.size, row, col)
    }

    /// Iterator over all edges, primed on the first one.
    #[inline]
    pub fn edges(&self) -> EdgeIter<'_, 'brand, K> {
        EdgeIter::new(self.view())
    }

    /// The end sentinel to compare [`K2Tree::edges`] against.
    #[inline]
    pub fn edge_end(&self) -> EdgeIter<'_, 'brand, K> {
        EdgeIter::with_size(self.view(), self.size, self.size)
    }

    /// Targets of `row`, ascending.
    #[inline]
    pub fn neighbors(&self, row: usize) -> Neighbors<'_, 'brand, K> {
        Neighbors::new(self.view(), row)
    }

    /// Materializes every edge in row-major order.
    pub fn collect_edges(&self) -> Result<Vec<Edge>> {
        self.edges().collect()
    }
}

/// Level-order construction: one `K²` block per non-empty quadrant.
fn build_levels<const K: usize>(size: usize, height: u16, cells: Vec<Edge>) -> (BitVec, BitVec) {
    let mut internal = BitVec::new();
    let mut leaves = BitVec::new();

    // (row origin, col origin, cells inside)
    let mut quadrants: Vec<(usize, usize, Vec<Edge>)> = vec![(0, 0, cells)];
    let mut side = size;
    for depth in 0..height {
        let child = side / K;
        let last = depth + 1 == height;
        let out = if last { &mut leaves } else { &mut internal };

        let mut next = Vec::new();
        for (row0, col0, cells) in quadrants {
            let mut buckets: Vec<Vec<Edge>> = vec![Vec::new(); K * K];
            for cell in cells {
                let i = (cell.row - row0) / child;
                let j = (cell.col - col0) / child;
                buckets[i * K + j].push(cell);
            }
            for (idx, bucket) in buckets.into_iter().enumerate() {
                out.push(!bucket.is_empty());
                if !last && !bucket.is_empty() {
                    next.push((row0 + (idx / K) * child, col0 + (idx % K) * child, bucket));
                }
            }
        }
        quadrants = next;
        side = child;
    }
    (internal, leaves)
}

/// Checks that `T` and `L` have exactly the lengths `height` implies.
fn validate_shape<const K: usize>(height: u16, internal: &BitVec, leaves: &BitVec, rank: &RankIndex) -> Result<()> {
    let block = K * K;
    if height == 1 {
        if !internal.is_empty() {
            return Err(K2Error::inconsistent(0, "single-level tree with a non-empty T"));
        }
        if !leaves.is_empty() && leaves.len() != block {
            return Err(K2Error::inconsistent(0, "single-level L must hold k² bits or none"));
        }
        return Ok(());
    }

    let mut start = 0;
    let mut level_len = block;
    for _ in 1..height {
        let end = start + level_len;
        if end > internal.len() {
            return Err(K2Error::inconsistent(internal.len(), "T ends before the deepest internal level"));
        }
        let ones = rank.rank1(internal, end) - rank.rank1(internal, start);
        start = end;
        level_len = ones * block;
    }
    if start != internal.len() {
        return Err(K2Error::inconsistent(start, "T continues past the deepest internal level"));
    }
    if leaves.len() != level_len {
        return Err(K2Error::inconsistent(
            start + leaves.len().min(level_len),
            "L length disagrees with the deepest internal level",
        ));
    }
    Ok(())
}

mod descent;
mod edge;
mod iter;
#[cfg(test)]
mod tests;
mod view;
