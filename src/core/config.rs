//! Game configuration.
//!
//! Everything tunable about a session lives in [`GameConfig`]: board
//! geometry, population counts, token-kind weights, timings, and the
//! policy applied after a scoring move. Configs can be built in code with
//! the `with_*` builder methods or loaded from TOML:
//!
//! ```toml
//! board_size = 9
//! color_count = 7
//! previews_per_turn = 3
//! match_policy = "KeepTurn"
//!
//! [weights]
//! normal = 73
//! ghost = 10
//! wild = 10
//! cleaner = 5
//! block = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ConfigError;

/// Relative weights for the kind of each populated token.
///
/// Only consulted once the opening turns (which always populate normal
/// tokens) are over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    pub normal: u32,
    pub ghost: u32,
    pub wild: u32,
    /// Shared by the horizontal and vertical cleaner.
    pub cleaner: u32,
    pub block: u32,
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            normal: 73,
            ghost: 10,
            wild: 10,
            cleaner: 5,
            block: 2,
        }
    }
}

impl KindWeights {
    /// Sum of all weights, or `None` if it does not fit in a `u32`.
    #[must_use]
    pub fn total(&self) -> Option<u32> {
        [self.ghost, self.wild, self.cleaner, self.block]
            .into_iter()
            .try_fold(self.normal, u32::checked_add)
    }
}

/// What happens after a player move that clears at least one line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// The player keeps control and moves again without a new turn.
    #[default]
    KeepTurn,
    /// The move consumes the turn like any other.
    EndTurn,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board.
    pub board_size: usize,

    /// Number of distinct token colors.
    pub color_count: u8,

    /// Previews placed when a game starts.
    pub initial_previews: usize,

    /// Previews placed at every following turn start.
    pub previews_per_turn: usize,

    /// Turns (1-based) that only ever populate normal tokens.
    pub normal_only_turns: u32,

    /// Kind weights used after the opening turns.
    pub weights: KindWeights,

    /// Driver time for a moving token to cross one cell, in seconds.
    pub move_step_secs: f32,

    /// Length of the time attack countdown, in seconds.
    pub time_attack_secs: f32,

    /// Driver time between two waves of the end-of-game sweep, in seconds.
    pub sweep_wave_secs: f32,

    /// Turn handling after a scoring move.
    pub match_policy: MatchPolicy,

    /// Seed for the board RNG.
    pub seed: u64,

    /// Enables the board editor.
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 9,
            color_count: 7,
            initial_previews: 7,
            previews_per_turn: 3,
            normal_only_turns: 5,
            weights: KindWeights::default(),
            move_step_secs: 0.2,
            time_attack_secs: 3.0,
            sweep_wave_secs: 0.05,
            match_policy: MatchPolicy::KeepTurn,
            seed: 42,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Set the board side length.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Set the palette size.
    #[must_use]
    pub fn with_color_count(mut self, count: u8) -> Self {
        self.color_count = count;
        self
    }

    /// Set the number of previews placed at game start.
    #[must_use]
    pub fn with_initial_previews(mut self, count: usize) -> Self {
        self.initial_previews = count;
        self
    }

    /// Set the number of previews placed per turn.
    #[must_use]
    pub fn with_previews_per_turn(mut self, count: usize) -> Self {
        self.previews_per_turn = count;
        self
    }

    /// Set the kind weights.
    #[must_use]
    pub fn with_weights(mut self, weights: KindWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the per-cell move duration. Zero resolves moves immediately.
    #[must_use]
    pub fn with_move_step_secs(mut self, secs: f32) -> Self {
        self.move_step_secs = secs;
        self
    }

    /// Set the time attack countdown.
    #[must_use]
    pub fn with_time_attack_secs(mut self, secs: f32) -> Self {
        self.time_attack_secs = secs;
        self
    }

    /// Set the delay between sweep waves. Zero sweeps in one step.
    #[must_use]
    pub fn with_sweep_wave_secs(mut self, secs: f32) -> Self {
        self.sweep_wave_secs = secs;
        self
    }

    /// Set the post-match policy.
    #[must_use]
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable debug features.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 5 {
            return Err(ConfigError::Validation("board_size must be >= 5".into()));
        }
        if self.board_size > i32::MAX as usize {
            return Err(ConfigError::Validation("board_size is too large".into()));
        }
        if !(1..=10).contains(&self.color_count) {
            return Err(ConfigError::Validation(
                "color_count must be between 1 and 10".into(),
            ));
        }
        if self.initial_previews > self.board_size * self.board_size {
            return Err(ConfigError::Validation(
                "initial_previews cannot exceed the number of cells".into(),
            ));
        }
        match self.weights.total() {
            None => {
                return Err(ConfigError::Validation(
                    "kind weights must sum to at most u32::MAX".into(),
                ))
            }
            Some(0) => {
                return Err(ConfigError::Validation(
                    "kind weights must not all be zero".into(),
                ))
            }
            Some(_) => {}
        }
        for (name, secs) in [
            ("move_step_secs", self.move_step_secs),
            ("time_attack_secs", self.time_attack_secs),
            ("sweep_wave_secs", self.sweep_wave_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.board_size * self.board_size
    }
}
