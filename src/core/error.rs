//! Error types.
//!
//! Only genuine faults are errors. Expected outcomes of play (no path,
//! board full) are plain values or events, never `Err`.

use std::path::PathBuf;

use super::coord::Coord;
use crate::turn::Phase;

/// Errors from grid access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("coordinate {coord} is outside the {size}x{size} board")]
    OutOfRange { coord: Coord, size: usize },
}

/// Errors from driving the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("a move is still in flight")]
    MoveInFlight,

    #[error("operation not allowed in phase {0:?}")]
    WrongPhase(Phase),

    #[error("time attack cannot be toggled during a time attack game")]
    TimeAttackLocked,

    #[error("the board editor is only available in debug mode")]
    EditorDisabled,

    #[error("the board editor is not open")]
    EditorClosed,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("saved game rejected: {0}")]
    Save(#[from] SaveError),
}

/// Errors from decoding saved data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("missing save key '{0}'")]
    MissingKey(&'static str),

    #[error("board string has length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid kind character {0:?}")]
    InvalidKind(char),

    #[error("invalid color character {0:?}")]
    InvalidColor(char),

    #[error("color {color} is outside the palette of {color_count}")]
    ColorOutOfRange { color: u8, color_count: u8 },

    #[error("empty cell marked as preview at {0}")]
    EmptyPreview(Coord),

    #[error("invalid value for '{key}': {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors from the key-value save store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corrupt store file {path}: {source}")]
    Encoding {
        path: PathBuf,
        source: bincode::Error,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_display() {
        let err = GridError::OutOfRange {
            coord: Coord::new(9, 2),
            size: 9,
        };
        assert_eq!(err.to_string(), "coordinate (9, 2) is outside the 9x9 board");
    }

    #[test]
    fn test_save_error_display() {
        let err = SaveError::LengthMismatch {
            expected: 81,
            actual: 80,
        };
        assert_eq!(err.to_string(), "board string has length 80, expected 81");
        assert_eq!(
            SaveError::InvalidKind('z').to_string(),
            "invalid kind character 'z'"
        );
    }

    #[test]
    fn test_turn_error_from_grid() {
        let err: TurnError = GridError::OutOfRange {
            coord: Coord::new(-1, 0),
            size: 9,
        }
        .into();
        assert!(matches!(err, TurnError::Grid(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("board_size must be >= 5".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: board_size must be >= 5"
        );
    }
}
