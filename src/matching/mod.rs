//! Line matching.
//!
//! Given the cell a token just arrived at, `MatchEngine` finds every line of
//! five or more matching active tokens through it, along the horizontal,
//! vertical, and both diagonal axes.
//!
//! ## Matching rules
//!
//! - Only active tokens match; previews and empty cells break a run.
//! - Wild matches any color and leaves the run's color open until a
//!   colored token fixes it.
//! - Blocks and cleaners never extend a color run.
//! - A cleaner moved by the player sweeps its row (horizontal) or column
//!   (vertical) instead. Populated cleaners are inert.
//!
//! The origin appears in exactly one returned group, so the union of all
//! groups counts every cleared cell once.

mod engine;

pub use engine::{score_value, Axis, MatchEngine, MatchGroup, MatchTrigger, MIN_LINE};
