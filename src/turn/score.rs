//! Score and high score.

use serde::{Deserialize, Serialize};

/// Running score for the current game plus the best finished score.
///
/// The high score never decreases. It is settled when a game ends, not on
/// every hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u64,
    high_score: u64,
}

impl Scoreboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously recorded high score.
    #[must_use]
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Add points for cleared tokens.
    pub fn add(&mut self, points: u32) {
        self.score += u64::from(points);
    }

    /// Reset the running score for a new game.
    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Restore a saved score.
    pub fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    /// Raise the high score to `high_score` if it is higher.
    pub fn merge_high_score(&mut self, high_score: u64) {
        self.high_score = self.high_score.max(high_score);
    }

    /// Fold the finished game into the high score. Returns whether the
    /// score beat the previous best.
    pub fn settle(&mut self) -> bool {
        let beaten = self.score > self.high_score;
        if beaten {
            self.high_score = self.score;
        }
        beaten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_settle() {
        let mut board = Scoreboard::with_high_score(100);
        board.add(50);
        board.add(30);
        assert_eq!(board.score(), 80);
        assert!(!board.settle());
        assert_eq!(board.high_score(), 100);

        board.add(30);
        assert!(board.settle());
        assert_eq!(board.high_score(), 110);
    }

    #[test]
    fn test_high_score_is_monotonic() {
        let mut board = Scoreboard::with_high_score(500);
        board.merge_high_score(200);
        assert_eq!(board.high_score(), 500);

        board.reset_score();
        board.add(10);
        board.settle();
        assert_eq!(board.high_score(), 500);
    }
}
