//! A single board position.

use serde::{Deserialize, Serialize};

use super::token::{Token, TokenKind};
use crate::core::Coord;

/// Cost value meaning "not reached yet".
pub const UNREACHED: u32 = u32::MAX;

/// One grid position holding at most one token.
///
/// A cell's coordinate is fixed at creation; only its contents change.
/// The `cost`/`predecessor` pair is pathfinder scratch space, reset at the
/// start of every search and meaningless outside one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coord: Coord,
    token: Token,
    is_preview: bool,

    #[serde(skip, default = "unreached")]
    pub(crate) cost: u32,
    #[serde(skip)]
    pub(crate) predecessor: Option<Coord>,
}

fn unreached() -> u32 {
    UNREACHED
}

impl Cell {
    /// Create an empty cell at `coord`.
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            token: Token::EMPTY,
            is_preview: false,
            cost: UNREACHED,
            predecessor: None,
        }
    }

    #[must_use]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.is_preview
    }

    /// True when the cell holds an active token: non-empty and not a preview.
    ///
    /// Only active tokens match, block movement, or can be selected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_preview && !self.token.is_empty()
    }

    /// True when a token may be moved onto this cell (empty or preview).
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        !self.is_active()
    }

    /// Active and movable (blocks never move).
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.is_active() && self.kind() != TokenKind::Block
    }

    /// Place a token that is not yet in play.
    pub fn set_preview(&mut self, token: Token) {
        self.token = token;
        self.is_preview = !token.is_empty();
    }

    /// Place a token directly in play.
    pub fn set_active(&mut self, token: Token) {
        self.token = token;
        self.is_preview = false;
    }

    /// Promote a preview token to active. No-op on other cells.
    pub fn actualize(&mut self) {
        self.is_preview = false;
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.token = Token::EMPTY;
        self.is_preview = false;
    }

    /// Reset pathfinding scratch state.
    pub(crate) fn reset_scratch(&mut self) {
        self.cost = UNREACHED;
        self.predecessor = None;
    }
}
