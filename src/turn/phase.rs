//! Game phases and modes.

use serde::{Deserialize, Serialize};

/// Where the turn engine is in the game lifecycle.
///
/// `Idle → Starting → TurnBegin → PlayerTurn → (TurnBegin | Ending) → Idle`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No game in progress.
    #[default]
    Idle,
    /// Board cleared, initial previews being placed.
    Starting,
    /// Previews landing and new ones being placed.
    TurnBegin,
    /// Waiting for, or resolving, a player move.
    PlayerTurn,
    /// Board full; terminal sweep running.
    Ending,
}

impl Phase {
    /// Whether a game is underway.
    #[must_use]
    pub const fn in_game(self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Game mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Normal,
    /// A countdown forces the next turn when it runs out.
    TimeAttack,
}

impl GameMode {
    #[must_use]
    pub const fn from_time_attack(time_attack: bool) -> Self {
        if time_attack {
            GameMode::TimeAttack
        } else {
            GameMode::Normal
        }
    }

    #[must_use]
    pub const fn is_time_attack(self) -> bool {
        matches!(self, GameMode::TimeAttack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_game() {
        assert!(!Phase::Idle.in_game());
        assert!(Phase::Starting.in_game());
        assert!(Phase::Ending.in_game());
    }

    #[test]
    fn test_mode_round_trip() {
        assert!(GameMode::from_time_attack(true).is_time_attack());
        assert_eq!(GameMode::from_time_attack(false), GameMode::Normal);
    }
}
