//! Lazy, resumable enumeration of the edges of a k2 structure.
//!
//! The iterator keeps the position of the last emitted edge: the source vertex,
//! the root row-band and one branch digit per deeper level. Advancing bumps the
//! deepest digit (carrying into shallower ones and finally into the row-band),
//! and the next search starts from exactly that point instead of from the
//! row's first column.

use core::fmt;
use core::iter::FusedIterator;
use core::ptr;

use super::descent::{descend, Frame, Quadrant};
use super::edge::Edge;
use super::view::{matrix_size, K2View};
use crate::error::{K2Error, Result};

/// Forward iterator over the present edges, in row-major order.
///
/// The iterator borrows the structure through a [`K2View`] and cannot outlive
/// it. Equality is decided by the currently stored edge alone, so a live
/// iterator equals [`EdgeIter::end`] exactly when it has run out.
///
/// As an [`Iterator`] it yields `Result<Edge, K2Error>`: a structural
/// inconsistency found while advancing is yielded once, after which the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct EdgeIter<'a, 'brand, const K: usize> {
    view: K2View<'a, 'brand>,
    size: usize,
    block_size: usize,
    current_node: usize,
    /// First row the search never enters; `size` unless bounded to one row.
    row_limit: usize,
    current_row_band: usize,
    base_offset: usize,
    /// Branch digit per level below the row-band: the resumption point.
    col_path: Vec<usize>,
    frames: Vec<Frame>,
    current: Edge,
    pending: Option<K2Error>,
}

impl<'a, 'brand, const K: usize> EdgeIter<'a, 'brand, K> {
    const ARITY_OK: () = assert!(K >= 2, "k2-tree arity must be at least 2");

    /// Creates an iterator primed on the first edge.
    ///
    /// A priming failure is not lost: it is returned by the first call to
    /// [`Iterator::next`] or [`EdgeIter::advance`].
    pub fn new(view: K2View<'a, 'brand>) -> Self {
        Self::starting_at(view, 0)
    }

    /// Creates an iterator primed on the first edge, failing fast.
    pub fn try_new(view: K2View<'a, 'brand>) -> Result<Self> {
        Self::try_starting_at(view, 0)
    }

    /// Creates an iterator primed on the first edge whose row is `>= node`.
    pub fn starting_at(view: K2View<'a, 'brand>, node: usize) -> Self {
        Self::primed(view, node, None)
    }

    /// Primes on `node`'s first edge and ends at the sentinel after `node`'s
    /// last one, never searching later rows.
    pub(crate) fn within_row(view: K2View<'a, 'brand>, node: usize) -> Self {
        Self::primed(view, node, Some(node.saturating_add(1)))
    }

    fn primed(view: K2View<'a, 'brand>, node: usize, row_limit: Option<usize>) -> Self {
        match matrix_size::<K>(view.height()) {
            Ok(size) => {
                let mut it = Self::with_size(view, size, node);
                if let Some(limit) = row_limit {
                    it.row_limit = limit.min(size);
                }
                if let Err(err) = it.search() {
                    it.pending = Some(err);
                }
                it
            }
            Err(err) => {
                let mut it = Self::with_size(view, 0, 0);
                it.pending = Some(err);
                it
            }
        }
    }

    /// Fallible form of [`EdgeIter::starting_at`].
    pub fn try_starting_at(view: K2View<'a, 'brand>, node: usize) -> Result<Self> {
        let size = matrix_size::<K>(view.height())?;
        let mut it = Self::with_size(view, size, node);
        it.search()?;
        Ok(it)
    }

    /// An iterator parked on the sentinel, built without searching.
    pub fn sentinel(view: K2View<'a, 'brand>) -> Result<Self> {
        let size = matrix_size::<K>(view.height())?;
        Ok(Self::with_size(view, size, size))
    }

    /// Unprimed state positioned at `node`; the stored edge is the sentinel.
    pub(crate) fn with_size(view: K2View<'a, 'brand>, size: usize, node: usize) -> Self {
        let () = Self::ARITY_OK;
        let block_size = size / K;
        let current_node = node.min(size);
        let base_offset = if current_node < size {
            K * (current_node / block_size)
        } else {
            0
        };
        Self {
            view,
            size,
            block_size,
            current_node,
            row_limit: size,
            current_row_band: 0,
            base_offset,
            col_path: vec![0; usize::from(view.height()).saturating_sub(1)],
            frames: Vec::with_capacity(usize::from(view.height())),
            current: Edge::sentinel(size),
            pending: None,
        }
    }

    /// The sentinel twin of this iterator, over the same view.
    pub fn end(&self) -> Self {
        Self::with_size(self.view, self.size, self.size)
    }

    /// The edge the iterator currently points at; the sentinel once exhausted.
    #[inline(always)]
    pub fn current(&self) -> Edge {
        self.current
    }

    /// Returns `true` once the stored edge is the sentinel.
    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.current.is_sentinel(self.size)
    }

    /// Matrix side length; also the sentinel coordinate.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The view this iterator reads.
    #[inline(always)]
    pub fn view(&self) -> &K2View<'a, 'brand> {
        &self.view
    }

    /// Returns `true` if both iterators read the very same sequences.
    #[inline]
    pub fn same_source<'b>(&self, other: &EdgeIter<'b, 'brand, K>) -> bool {
        ptr::eq(self.view.internal(), other.view.internal()) && ptr::eq(self.view.leaves(), other.view.leaves())
    }

    /// Moves to the next edge. A no-op once the sentinel has been reached.
    pub fn advance(&mut self) -> Result<()> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if self.is_end() {
            return Ok(());
        }

        let mut carry = true;
        for digit in self.col_path.iter_mut().rev() {
            *digit += 1;
            if *digit < K {
                carry = false;
                break;
            }
            *digit = 0;
        }
        if carry {
            self.current_row_band += 1;
        }
        self.search()
    }

    /// Runs [`Self::find_next`]; on failure parks the iterator on the sentinel.
    fn search(&mut self) -> Result<()> {
        let found = self.find_next();
        if let Err(_err) = &found {
            #[cfg(feature = "tracing")]
            tracing::warn!(node = self.current_node, error = %_err, "k2 edge enumeration stopped");
            self.current_node = self.size;
            self.current = Edge::sentinel(self.size);
        }
        found
    }

    fn find_next(&mut self) -> Result<()> {
        if self.view.leaf_len() == 0 {
            self.current_node = self.size;
        }

        while self.current_node < self.row_limit {
            let start_row = self.current_node % self.block_size;
            let side = self.block_size / K;

            while self.current_row_band < K {
                let start = Quadrant {
                    level: self.base_offset + self.current_row_band,
                    side,
                    row: start_row,
                    col: self.block_size * self.current_row_band,
                    depth: 0,
                };
                if let Some(neigh) = descend::<K>(&self.view, start, &mut self.col_path, &mut self.frames)? {
                    self.current = Edge::new(self.current_node, neigh);
                    return Ok(());
                }
                self.current_row_band += 1;
                self.col_path.fill(0);
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(node = self.current_node, "k2 row exhausted");

            self.current_row_band = 0;
            self.col_path.fill(0);
            self.current_node += 1;
            if self.current_node < self.size {
                self.base_offset = K * (self.current_node / self.block_size);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(node = self.current_node, "k2 enumeration reached the sentinel");
        self.current = Edge::sentinel(self.size);
        Ok(())
    }
}

impl<const K: usize> Iterator for EdgeIter<'_, '_, K> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        if self.is_end() {
            return None;
        }
        let edge = self.current;
        if let Err(err) = self.advance() {
            self.pending = Some(err);
        }
        Some(Ok(edge))
    }
}

impl<const K: usize> FusedIterator for EdgeIter<'_, '_, K> {}

impl<'a, 'b, 'brand, const K: usize> PartialEq<EdgeIter<'b, 'brand, K>> for EdgeIter<'a, 'brand, K> {
    #[inline]
    fn eq(&self, other: &EdgeIter<'b, 'brand, K>) -> bool {
        self.current == other.current
    }
}

impl<const K: usize> Eq for EdgeIter<'_, '_, K> {}

impl<const K: usize> fmt::Display for EdgeIter<'_, '_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " ==== k2 edge iterator ==== ")?;
        if self.is_end() {
            writeln!(f, " END NODE")?;
        }
        writeln!(f, " ptr {}", self.current)?;
        writeln!(f, " CONTAINER")?;
        writeln!(f, "     T {}", self.view.internal())?;
        writeln!(f, "     L {}", self.view.leaves())?;
        writeln!(f, "     height {}", self.view.height())?;
        write!(f, " ==========================")
    }
}

/// Targets of one source vertex, ascending. Built by [`super::K2Tree::neighbors`].
#[derive(Debug, Clone)]
pub struct Neighbors<'a, 'brand, const K: usize> {
    inner: EdgeIter<'a, 'brand, K>,
}

impl<'a, 'brand, const K: usize> Neighbors<'a, 'brand, K> {
    pub(crate) fn new(view: K2View<'a, 'brand>, row: usize) -> Self {
        Self {
            inner: EdgeIter::within_row(view, row),
        }
    }
}

impl<const K: usize> Iterator for Neighbors<'_, '_, K> {
    type Item = Result<usize>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|edge| edge.map(|edge| edge.col))
    }
}

impl<const K: usize> FusedIterator for Neighbors<'_, '_, K> {}
