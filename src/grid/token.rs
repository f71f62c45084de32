//! Token kinds and token values.
//!
//! A token is what a cell holds: a kind plus a color. Colored kinds
//! (`Normal`, `Ghost`) carry a palette index; every colorless kind carries
//! its own sentinel, so no two colorless kinds and no real color ever
//! compare equal.

use serde::{Deserialize, Serialize};

/// Category of a token.
///
/// The discriminants are stable: the save format encodes a kind as
/// `'a' + ordinal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenKind {
    #[default]
    Empty = 0,
    Normal = 1,
    /// Colored token that passes through occupied cells when moved.
    Ghost = 2,
    /// Matches any color.
    Wild = 3,
    /// Clears its whole row when moved by the player.
    CleanerHorizontal = 4,
    /// Clears its whole column when moved by the player.
    CleanerVertical = 5,
    /// Immovable obstacle that never matches.
    Block = 6,
}

impl TokenKind {
    /// All kinds in ordinal order.
    pub const ALL: [TokenKind; 7] = [
        TokenKind::Empty,
        TokenKind::Normal,
        TokenKind::Ghost,
        TokenKind::Wild,
        TokenKind::CleanerHorizontal,
        TokenKind::CleanerVertical,
        TokenKind::Block,
    ];

    /// Stable ordinal of this kind.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Kind with the given ordinal.
    #[must_use]
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Whether tokens of this kind carry a palette color.
    #[must_use]
    pub const fn is_colored(self) -> bool {
        matches!(self, TokenKind::Normal | TokenKind::Ghost)
    }

    #[must_use]
    pub const fn is_cleaner(self) -> bool {
        matches!(self, TokenKind::CleanerHorizontal | TokenKind::CleanerVertical)
    }

    /// Step `delta` kinds forward, wrapping around the ordinal range.
    #[must_use]
    pub fn cycle(self, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let next = (self.ordinal() as i32 + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }

    /// Sentinel color for colorless kinds.
    const fn sentinel(self) -> i8 {
        match self {
            TokenKind::Wild => Token::WILD_COLOR,
            TokenKind::CleanerHorizontal | TokenKind::CleanerVertical => Token::CLEANER_COLOR,
            TokenKind::Block => Token::BLOCK_COLOR,
            TokenKind::Empty | TokenKind::Normal | TokenKind::Ghost => Token::EMPTY_COLOR,
        }
    }
}

/// A token value: kind plus color.
///
/// Invariant: `kind == Empty` iff `color == Token::EMPTY_COLOR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    kind: TokenKind,
    color: i8,
}

impl Default for Token {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Token {
    pub const WILD_COLOR: i8 = -1;
    pub const CLEANER_COLOR: i8 = -2;
    pub const BLOCK_COLOR: i8 = -3;
    pub const EMPTY_COLOR: i8 = -4;

    /// The empty token.
    pub const EMPTY: Token = Token {
        kind: TokenKind::Empty,
        color: Token::EMPTY_COLOR,
    };

    /// Create a token. `color` is only kept for colored kinds; colorless
    /// kinds always take their sentinel.
    #[must_use]
    pub const fn new(kind: TokenKind, color: u8) -> Self {
        let color = if kind.is_colored() {
            color as i8
        } else {
            kind.sentinel()
        };
        Self { kind, color }
    }

    /// A normal token of the given color.
    #[must_use]
    pub const fn normal(color: u8) -> Self {
        Self::new(TokenKind::Normal, color)
    }

    /// A ghost token of the given color.
    #[must_use]
    pub const fn ghost(color: u8) -> Self {
        Self::new(TokenKind::Ghost, color)
    }

    /// A token of a colorless kind.
    #[must_use]
    pub const fn colorless(kind: TokenKind) -> Self {
        Self::new(kind, 0)
    }

    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Raw color value, negative for sentinels.
    #[must_use]
    pub const fn raw_color(&self) -> i8 {
        self.color
    }

    /// Palette index for colored kinds.
    #[must_use]
    pub const fn color(&self) -> Option<u8> {
        if self.color >= 0 {
            Some(self.color as u8)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.kind, TokenKind::Empty)
    }
}
