//! # `k2tree` - Succinct adjacency matrices with lazy edge enumeration
//!
//! A k2-tree stores the adjacency matrix of a sparse graph as two bit sequences:
//! `T`, one bit per internal quadrant saying whether anything below it is set,
//! and `L`, the matrix cells of the deepest level. A rank index over `T` turns
//! a node's level-order position into the offset of its children, so no
//! pointers are stored at all.
//!
//! The centre of the crate is [`EdgeIter`]: it enumerates the present edges in
//! row-major order one at a time, walking the bits on demand and resuming each
//! step exactly where the previous one stopped.
//!
//! ## Branding
//!
//! Trees, views and iterators are branded by the [`GhostToken`] scope they were
//! built in. Iterator equality compares the current edge only, and is only
//! defined within one brand, so iterators over trees from unrelated scopes
//! cannot be confused with each other.
//!
//! ## Example
//!
//! ```rust
//! use k2tree::{Edge, GhostToken, K2Tree};
//!
//! GhostToken::new(|token| {
//!     let tree = K2Tree::<2>::from_edges(&token, 4, &[(0, 1), (1, 3), (3, 0)])?;
//!
//!     let edges = tree.collect_edges()?;
//!     assert_eq!(edges, vec![Edge::new(0, 1), Edge::new(1, 3), Edge::new(3, 0)]);
//!
//!     // Cursor-style enumeration against the end sentinel.
//!     let end = tree.edge_end();
//!     let mut it = tree.edges();
//!     let mut count = 0;
//!     while it != end {
//!         count += 1;
//!         it.advance()?;
//!     }
//!     assert_eq!(count, 3);
//!     Ok::<(), k2tree::K2Error>(())
//! })
//! .unwrap();
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod bits;
pub mod error;
pub mod graph;
pub mod token;

pub use bits::{BitVec, RankIndex};
pub use error::{K2Error, Result};
pub use graph::{Edge, EdgeIter, K2Parts, K2Tree, K2View, Neighbors};
pub use token::{GhostToken, InvariantLifetime};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Tokens and brands are ZSTs.
    assert!(mem::size_of::<GhostToken<'static>>() == 0);
    assert!(mem::size_of::<InvariantLifetime<'static>>() == 0);

    // Edges are two plain coordinates, stored by value.
    assert!(mem::size_of::<Edge>() == 2 * mem::size_of::<usize>());
};
