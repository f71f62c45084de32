//! Core engine types: coordinates, RNG, configuration, errors.
//!
//! This module contains the foundation every subsystem builds on.
//! Sessions are configured via `GameConfig` rather than by modifying the core.

pub mod coord;
pub mod rng;
pub mod config;
pub mod error;

pub use coord::Coord;
pub use rng::{GameRng, GameRngState, RandomSource};
pub use config::{GameConfig, KindWeights, MatchPolicy};
pub use error::{ConfigError, GridError, SaveError, StoreError, TurnError};
