//! Board storage: tokens, cells, and the square grid.
//!
//! - `Token`/`TokenKind`: what a cell holds
//! - `Cell`: one position with its token, preview flag, and pathfinding scratch
//! - `Grid`: the fixed `size × size` collection with coordinate lookup

pub mod token;
pub mod cell;
pub mod board;

pub use token::{Token, TokenKind};
pub use cell::{Cell, UNREACHED};
pub use board::{Grid, Neighbors};
