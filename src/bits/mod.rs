//! Bit sequences and the rank index the k2-tree reads through.

pub mod bit_vec;
pub mod rank;

pub use bit_vec::BitVec;
pub use rank::RankIndex;
