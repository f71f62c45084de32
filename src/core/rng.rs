//! Deterministic random number generation for board population.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical boards
//! - **Serializable**: O(1) state capture and restore, so a resumed game
//!   keeps drawing the populations it would have drawn
//!
//! The board only ever needs two primitives from its random source: a
//! uniform integer below a bound and a fair coin. Those live on the
//! [`RandomSource`] trait so tests can script the draws.
//!
//! ```
//! use gem_lines::core::{GameRng, RandomSource};
//!
//! let mut rng = GameRng::new(42);
//! rng.below(100);
//!
//! let checkpoint = rng.state();
//! let mut resumed = GameRng::from_state(&checkpoint);
//! assert_eq!(rng.below(1000), resumed.below(1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of the uniform draws the board consumes.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn below(&mut self, bound: u32) -> u32;

    /// Fair coin flip.
    fn coin(&mut self) -> bool;
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "below() needs a non-zero bound");
        self.inner.gen_range(0..bound)
    }

    fn coin(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.below(1000), rng2.below(1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.below(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.below(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_below_stays_in_bound() {
        let mut rng = GameRng::new(9);
        for bound in 1..50 {
            assert!(rng.below(bound) < bound);
        }
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn test_coin_takes_both_sides() {
        let mut rng = GameRng::new(3);
        let heads = (0..1000).filter(|_| rng.coin()).count();
        assert!(heads > 400 && heads < 600, "heads = {heads}");
    }

    #[test]
    fn test_state_serialization() {
        let mut rng = GameRng::new(42);

        for _ in 0..100 {
            rng.below(1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.below(1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.below(1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
