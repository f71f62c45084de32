//! Events published by the turn engine.
//!
//! The engine reports everything a presentation layer needs through an
//! [`EventSink`] it owns. Sinks are called synchronously, in order, from
//! inside the engine call that caused the event.
//!
//! ## Provided sinks
//!
//! - [`EventLog`]: buffers events for the driver to drain
//! - [`NullSink`]: discards everything
//! - `std::sync::mpsc::Sender<TurnEvent>`: forwards to another thread

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::phase::Phase;
use crate::core::Coord;
use crate::session::PreviewHint;

/// Something that happened during play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// The engine moved to a new phase.
    PhaseEntered(Phase),
    /// The previews placed this turn, in reveal order.
    PreviewsReady(Vec<PreviewHint>),
    /// A token was picked up for moving.
    Selected(Coord),
    /// The selection was dropped.
    SelectionCleared,
    /// A move was accepted. Input stays closed until it resolves.
    MoveStarted { from: Coord, path: Vec<Coord> },
    /// A move request had no path to its destination.
    NoPath { from: Coord, to: Coord },
    /// A move landed.
    MoveResolved {
        from: Coord,
        to: Coord,
        cleared: usize,
        points: u32,
    },
    /// Points registered for one hit.
    Scored { points: u32, cleared: usize },
    /// A displaced preview was moved off the destination of a move.
    PreviewRelocated { from: Coord, to: Coord },
    /// The time attack countdown ran out and forced a new turn.
    TimeAttackExpired,
    /// No empty cell was left to populate.
    BoardFull,
    /// One diagonal of the terminal sweep was cleared.
    SweepWave(Vec<Coord>),
    /// The sweep finished and the final score was recorded.
    GameOver { score: u64, new_high_score: bool },
    /// Pause was switched on or off.
    Paused(bool),
    /// The board editor was opened or closed.
    EditorToggled(bool),
}

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, event: TurnEvent);
}

/// Buffers events in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<TurnEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: TurnEvent) {
        self.events.push(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: TurnEvent) {}
}

impl EventSink for Sender<TurnEvent> {
    fn emit(&mut self, event: TurnEvent) {
        if self.send(event).is_err() {
            trace!("event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_drain() {
        let mut log = EventLog::new();
        log.emit(TurnEvent::Paused(true));
        log.emit(TurnEvent::BoardFull);
        assert_eq!(log.len(), 2);

        let drained = log.drain();
        assert_eq!(drained, vec![TurnEvent::Paused(true), TurnEvent::BoardFull]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_channel_sink() {
        let (mut tx, rx) = std::sync::mpsc::channel();
        tx.emit(TurnEvent::PhaseEntered(Phase::Starting));
        assert_eq!(rx.recv().unwrap(), TurnEvent::PhaseEntered(Phase::Starting));

        drop(rx);
        // A dropped receiver is not an error.
        tx.emit(TurnEvent::BoardFull);
    }

    #[test]
    fn test_event_json_shape() {
        let event = TurnEvent::Scored {
            points: 50,
            cleared: 5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"Scored":{"points":50,"cleared":5}}"#);
    }
}
