//! Piece generation and the next-piece preview queue
//!
//! Pieces are drawn uniformly at random, each draw independent of the last.
//! There is deliberately no bag shuffle: duplicates and droughts are part of
//! the game's feel.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Number of upcoming pieces shown to the player
pub const PREVIEW_COUNT: usize = 3;

/// Uniform piece generator with a constant-length preview queue
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: ChaCha8Rng,
    queue: VecDeque<TetrominoType>,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceQueue {
    /// Create a queue seeded from entropy
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a queue with a fixed seed, for reproducible games
    pub fn with_seed(seed: u64) -> Self {
        let mut queue = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            queue: VecDeque::with_capacity(PREVIEW_COUNT + 1),
        };
        for _ in 0..=PREVIEW_COUNT {
            let piece = queue.draw();
            queue.queue.push_back(piece);
        }
        queue
    }

    /// Take the next piece. One fresh draw is pushed for every piece consumed,
    /// so the queue length never changes.
    pub fn next(&mut self) -> TetrominoType {
        let piece = self.queue.pop_front().expect("queue is never empty");
        let refill = self.draw();
        self.queue.push_back(refill);
        piece
    }

    /// Peek at the upcoming pieces without consuming them
    pub fn preview(&self) -> impl Iterator<Item = TetrominoType> + '_ {
        self.queue.iter().copied().take(PREVIEW_COUNT)
    }

    fn draw(&mut self) -> TetrominoType {
        let types = TetrominoType::all();
        types[self.rng.gen_range(0..types.len())]
    }
}
