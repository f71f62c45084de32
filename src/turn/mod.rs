//! Turn sequencing.
//!
//! `TurnEngine` is the only holder of session-level mutable state: the
//! phase, turn count, mode, score, and clocks. It drives a `BoardSession`
//! through the phases and reports progress to an `EventSink`.
//!
//! ## Phases
//!
//! ```text
//! Idle ──new_game──▶ Starting ──▶ TurnBegin ──▶ PlayerTurn ──▶ TurnBegin
//!                                     │              │
//!                                     └─board full───┴──▶ Ending ──▶ Idle
//! ```
//!
//! ## Key Types
//!
//! - `TurnEngine`: the state machine
//! - `TurnEvent` / `EventSink`: what the engine reports and where
//! - `Scoreboard`: score and high score
//! - `Countdown` / `Stopwatch`: driver-time clocks

pub mod clock;
pub mod engine;
pub mod events;
pub mod phase;
pub mod score;

pub use clock::{Countdown, Stopwatch};
pub use engine::{MoveRecord, TurnEngine};
pub use events::{EventLog, EventSink, NullSink, TurnEvent};
pub use phase::{GameMode, Phase};
pub use score::Scoreboard;
