//! Graph representations built on succinct bit sequences.
//!
//! - `k2`: k2-tree adjacency matrices with lazy edge enumeration

pub mod k2;

pub use k2::{Edge, EdgeIter, K2Parts, K2Tree, K2View, Neighbors};
