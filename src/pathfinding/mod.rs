//! Constrained pathfinding for player moves.
//!
//! A* over the 4-connected grid: unit step cost, Manhattan heuristic,
//! lowest `g + h` first with ties going to the earliest-queued cell.
//!
//! Expansion from the source tries left, right, up, down. Every later
//! expansion continues straight first, then turns sideways, and never
//! reverses. Active tokens block the way unless the moving token is a ghost.

mod astar;

pub use astar::{Heading, PathFinder};
