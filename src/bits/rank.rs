//! Rank-of-ones index over an immutable [`BitVec`].
//!
//! One level of cumulative counts, taken every [`SUPERBLOCK_WORDS`] words.
//! A query is one table lookup plus at most that many word popcounts.

use serde::{Deserialize, Serialize};

use super::bit_vec::{BitVec, WORD_BITS};

/// Words per superblock (512 bits).
pub const SUPERBLOCK_WORDS: usize = 8;

/// Prefix popcounts for a bit sequence that no longer changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankIndex {
    /// `superblocks[i]` = number of 1-bits in words `[0, i * SUPERBLOCK_WORDS)`.
    superblocks: Vec<usize>,
    len: usize,
    ones: usize,
}

impl RankIndex {
    /// Builds the index over `bits`.
    pub fn new(bits: &BitVec) -> Self {
        let words = bits.words();
        let mut superblocks = Vec::with_capacity(words.len() / SUPERBLOCK_WORDS + 1);
        let mut cumulative = 0usize;
        for chunk in words.chunks(SUPERBLOCK_WORDS) {
            superblocks.push(cumulative);
            cumulative += chunk.iter().map(|w| w.count_ones() as usize).sum::<usize>();
        }
        Self {
            superblocks,
            len: bits.len(),
            ones: cumulative,
        }
    }

    /// Number of bits the index was built over.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the index covers an empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of 1-bits.
    #[inline]
    pub fn total_ones(&self) -> usize {
        self.ones
    }

    /// Number of 1-bits in `bits[0, index)`.
    ///
    /// `bits` must be the sequence this index was built from. Indices past the
    /// end clamp to the length.
    pub fn rank1(&self, bits: &BitVec, index: usize) -> usize {
        debug_assert_eq!(bits.len(), self.len, "rank index built over a different sequence");
        let index = index.min(self.len);
        if index == self.len {
            return self.ones;
        }

        let word_idx = index / WORD_BITS;
        let block = word_idx / SUPERBLOCK_WORDS;
        let words = bits.words();

        let mut count = self.superblocks[block];
        for word in &words[block * SUPERBLOCK_WORDS..word_idx] {
            count += word.count_ones() as usize;
        }
        let offset = index % WORD_BITS;
        if offset != 0 {
            let mask = (1u64 << offset) - 1;
            count += (words[word_idx] & mask).count_ones() as usize;
        }
        count
    }

    /// Number of 0-bits in `bits[0, index)`.
    #[inline]
    pub fn rank0(&self, bits: &BitVec, index: usize) -> usize {
        index.min(self.len) - self.rank1(bits, index)
    }
}
