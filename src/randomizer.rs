//! Uniform piece randomizer
//!
//! Every draw picks one of the 7 tetrominoes with equal probability.
//! There is no bag and no history, so droughts and repeats can happen.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable source of random tetromino types
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Create a randomizer with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a randomizer with a fixed seed (reproducible piece stream)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next piece type
    pub fn next(&mut self) -> TetrominoType {
        let all = TetrominoType::all();
        all[self.rng.gen_range(0..all.len())]
    }
}

/// One-shot uniform pick from the thread-local generator
pub fn random_type() -> TetrominoType {
    let all = TetrominoType::all();
    all[rand::thread_rng().gen_range(0..all.len())]
}
