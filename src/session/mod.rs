//! Board session: the player-facing board.
//!
//! `BoardSession` aggregates the grid, the preview queue, the empty-cell
//! set, the current selection, and the random source used for population.
//! It is the only code that mutates the grid during play, so it owns the
//! consistency between the grid and its two indexes.
//!
//! ## Key Types
//!
//! - `BoardSession`: population, actualization, selection, move application
//! - `EmptySet`: uniform random pick over empty cells
//! - `MovePlan` / `MoveResolution`: a validated move and its applied outcome
//! - `Clearance`: the cells and points from one hit
//! - `PreviewHint`: what the player may see of an upcoming preview

pub mod board;
mod editor;
pub mod empty_set;
pub mod population;

pub use board::{
    BoardSession, Clearance, ClickOutcome, MovePlan, MoveResolution, PopulateReport, PreviewHint,
};
pub use empty_set::EmptySet;
pub use population::token_for_turn;
