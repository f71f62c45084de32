//! # gem-lines
//!
//! Engine for a turn-based line-up-five grid puzzle. Players move a token
//! along free cells to line up five or more of one color, which clears
//! them for points; each turn drops new tokens on the board until it is
//! full and the game ends.
//!
//! ## Design Principles
//!
//! 1. **Driver-Owned Time**: Nothing happens on its own. The host calls
//!    `TurnEngine::advance` with elapsed seconds; moves, the time attack
//!    countdown, and the end-of-game sweep all run off that.
//!
//! 2. **Atomic Moves**: A move is planned without touching the board and
//!    applied in one step once its travel time has passed.
//!
//! 3. **Explicit Wiring**: The board, random source, and event sink are
//!    constructed and handed to the engine; there is no global state.
//!
//! ## Modules
//!
//! - `core`: Coordinates, RNG, configuration, errors
//! - `grid`: Tokens, cells, and the square board
//! - `matching`: Line detection through a cell
//! - `pathfinding`: A* move paths with ghost pass-through
//! - `session`: The board session (population, selection, moves, editor)
//! - `turn`: Phase state machine, events, score, clocks
//! - `persist`: Save strings and key-value stores
//!
//! ## Example
//!
//! ```
//! use gem_lines::{GameConfig, Phase, TurnEngine};
//!
//! let mut engine = TurnEngine::new(GameConfig::default().with_seed(7));
//! engine.new_game().unwrap();
//! assert_eq!(engine.phase(), Phase::PlayerTurn);
//! assert_eq!(engine.turn_count(), 1);
//! assert_eq!(engine.board().previews().len(), 3);
//! ```

pub mod core;
pub mod grid;
pub mod matching;
pub mod pathfinding;
pub mod persist;
pub mod session;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, Coord, GameConfig, GameRng, GameRngState, GridError, KindWeights, MatchPolicy,
    RandomSource, SaveError, StoreError, TurnError,
};

pub use crate::grid::{Cell, Grid, Token, TokenKind};

pub use crate::matching::{Axis, MatchEngine, MatchGroup, MatchTrigger};

pub use crate::pathfinding::{Heading, PathFinder};

pub use crate::session::{
    BoardSession, Clearance, ClickOutcome, EmptySet, MovePlan, MoveResolution, PopulateReport,
    PreviewHint,
};

pub use crate::turn::{
    EventLog, EventSink, GameMode, MoveRecord, NullSink, Phase, Scoreboard, TurnEngine, TurnEvent,
};

pub use crate::persist::{FileStore, KeyValueStore, MemoryStore, SaveGame, SaveValue};
