//! Repeat-limited randomizer for piece generation
//!
//! Every draw is uniform over the 7 types, except that a type already filling
//! the whole recent-spawn window is redrawn. With the default window of 2 no
//! type ever appears three times in a row.

use crate::tetromino::PieceType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Default anti-repeat limit
pub const MAX_CONSECUTIVE: usize = 2;

/// Sliding window of the most recently generated types, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnHistory {
    entries: VecDeque<PieceType>,
    capacity: usize,
}

impl SpawnHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, piece: PieceType) -> usize {
        self.entries.iter().filter(|&&p| p == piece).count()
    }

    /// Append, evicting the oldest entry once over capacity
    pub fn push(&mut self, piece: PieceType) {
        self.entries.push_back(piece);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PieceType> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The next-piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: ChaCha8Rng,
    history: SpawnHistory,
    max_consecutive: usize,
}

impl PieceGenerator {
    /// Create a generator seeded from the thread RNG
    pub fn new(max_consecutive: usize) -> Self {
        Self::with_seed(max_consecutive, rand::random())
    }

    /// Create a deterministic generator (replays, tests)
    pub fn with_seed(max_consecutive: usize, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            history: SpawnHistory::new(max_consecutive),
            max_consecutive,
        }
    }

    pub fn history(&self) -> &SpawnHistory {
        &self.history
    }

    /// Whether `candidate` would exceed the repeat limit
    fn is_rejected(&self, candidate: PieceType) -> bool {
        self.history.len() >= self.max_consecutive
            && self.history.count(candidate) >= self.max_consecutive
    }

    /// Get the next piece type
    pub fn next(&mut self) -> PieceType {
        let all = PieceType::all();
        let piece = loop {
            let candidate = all[self.rng.gen_range(0..all.len())];
            if !self.is_rejected(candidate) {
                break candidate;
            }
        };
        self.history.push(piece);
        piece
    }

    /// Forget recent spawns; the RNG stream continues
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
