//! Token generation for populated cells.

use crate::core::{GameConfig, KindWeights, RandomSource};
use crate::grid::{Token, TokenKind};

impl KindWeights {
    /// Draw a kind.
    ///
    /// A uniform value in `[0, total)` has the category weights subtracted
    /// in priority order (cleaner, wild, ghost, block); the first category
    /// that drives it negative wins, and whatever remains is normal. A
    /// cleaner is horizontal or vertical with equal probability.
    ///
    /// Weights that sum to zero or past `u32::MAX` (which validation
    /// rejects) always give normal tokens.
    pub fn pick<R: RandomSource>(&self, rng: &mut R) -> TokenKind {
        let Some(total) = self.total().filter(|&t| t > 0) else {
            return TokenKind::Normal;
        };

        let mut value = i64::from(rng.below(total));
        for (weight, kind) in [
            (self.cleaner, TokenKind::CleanerHorizontal),
            (self.wild, TokenKind::Wild),
            (self.ghost, TokenKind::Ghost),
            (self.block, TokenKind::Block),
        ] {
            value -= i64::from(weight);
            if value < 0 {
                if kind == TokenKind::CleanerHorizontal && rng.coin() {
                    return TokenKind::CleanerVertical;
                }
                return kind;
            }
        }
        TokenKind::Normal
    }
}

/// Generate the token for a cell populated at the start of `turn`.
///
/// The opening turns only ever populate normal tokens. Colored kinds draw a
/// uniform color from the palette.
pub fn token_for_turn<R: RandomSource>(config: &GameConfig, turn: u32, rng: &mut R) -> Token {
    let kind = if turn <= config.normal_only_turns {
        TokenKind::Normal
    } else {
        config.weights.pick(rng)
    };
    let color = if kind.is_colored() {
        rng.below(u32::from(config.color_count)) as u8
    } else {
        0
    };
    Token::new(kind, color)
}
