//! Saved game state.

use tracing::debug;

use super::encoding::{decode_grid, encode_grid};
use super::store::{KeyValueStore, SaveValue};
use crate::core::{GameRngState, SaveError, StoreError};
use crate::grid::Grid;

/// Store keys.
pub mod keys {
    pub const KINDS: &str = "kinds";
    pub const COLORS: &str = "colors";
    pub const ELAPSED: &str = "elapsed";
    pub const SCORE: &str = "score";
    pub const TURN: &str = "turn";
    pub const TIME_ATTACK: &str = "time_attack";
    pub const HIGH_SCORE: &str = "high_score";
    /// Population RNG seed and ChaCha word position, as decimal text.
    pub const RNG_SEED: &str = "rng_seed";
    pub const RNG_POS: &str = "rng_pos";

    /// Keys that belong to the game in progress. The high score is kept
    /// across games and is not among them.
    pub const GAME: [&str; 8] = [
        KINDS,
        COLORS,
        ELAPSED,
        SCORE,
        TURN,
        TIME_ATTACK,
        RNG_SEED,
        RNG_POS,
    ];
}

/// Snapshot of a game in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveGame {
    pub kinds: String,
    pub colors: String,
    pub elapsed: f64,
    pub score: u64,
    pub turn: u32,
    pub time_attack: bool,
    pub high_score: u64,
    /// Where the population RNG stood. Saves without it resume with
    /// whatever stream the loading engine already has.
    pub rng: Option<GameRngState>,
}

impl SaveGame {
    /// Capture the board and counters.
    #[must_use]
    pub fn capture(
        grid: &Grid,
        elapsed: f64,
        score: u64,
        turn: u32,
        time_attack: bool,
        high_score: u64,
    ) -> Self {
        let (kinds, colors) = encode_grid(grid);
        Self {
            kinds,
            colors,
            elapsed,
            score,
            turn,
            time_attack,
            high_score,
            rng: None,
        }
    }

    /// Attach the population RNG checkpoint.
    #[must_use]
    pub fn with_rng(mut self, rng: GameRngState) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Decode the saved board.
    pub fn grid(&self, size: usize, color_count: u8) -> Result<Grid, SaveError> {
        decode_grid(&self.kinds, &self.colors, size, color_count)
    }

    /// Write every key.
    pub fn write_to<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(keys::KINDS, SaveValue::Text(self.kinds.clone()))?;
        store.set(keys::COLORS, SaveValue::Text(self.colors.clone()))?;
        store.set(keys::ELAPSED, SaveValue::Float(self.elapsed))?;
        store.set(keys::SCORE, SaveValue::Int(self.score as i64))?;
        store.set(keys::TURN, SaveValue::Int(i64::from(self.turn)))?;
        store.set(keys::TIME_ATTACK, SaveValue::Bool(self.time_attack))?;
        match &self.rng {
            Some(rng) => {
                store.set(keys::RNG_SEED, SaveValue::Text(rng.seed.to_string()))?;
                store.set(keys::RNG_POS, SaveValue::Text(rng.word_pos.to_string()))?;
            }
            None => {
                store.remove(keys::RNG_SEED)?;
                store.remove(keys::RNG_POS)?;
            }
        }
        write_high_score(store, self.high_score)?;
        debug!(turn = self.turn, score = self.score, "game saved");
        Ok(())
    }

    /// Read a saved game. Fails if any game key is missing or malformed.
    pub fn read_from<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, SaveError> {
        let kinds = text(store, keys::KINDS)?;
        let colors = text(store, keys::COLORS)?;
        let elapsed = required(store, keys::ELAPSED, SaveValue::as_float)?;
        let score = non_negative(store, keys::SCORE)?;
        let turn = non_negative(store, keys::TURN)?;
        let turn = u32::try_from(turn).map_err(|_| SaveError::InvalidValue {
            key: keys::TURN,
            value: turn.to_string(),
        })?;
        let time_attack = required(store, keys::TIME_ATTACK, SaveValue::as_bool)?;
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(SaveError::InvalidValue {
                key: keys::ELAPSED,
                value: elapsed.to_string(),
            });
        }
        Ok(Self {
            kinds,
            colors,
            elapsed,
            score,
            turn,
            time_attack,
            high_score: read_high_score(store),
            rng: read_rng(store)?,
        })
    }

    /// Remove the game in progress, keeping the high score.
    pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
        for key in keys::GAME {
            store.remove(key)?;
        }
        Ok(())
    }
}

/// The stored high score, or zero.
#[must_use]
pub fn read_high_score<S: KeyValueStore + ?Sized>(store: &S) -> u64 {
    store
        .get(keys::HIGH_SCORE)
        .and_then(SaveValue::as_int)
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

/// Record `high_score` unless the store already holds a higher one.
pub fn write_high_score<S: KeyValueStore + ?Sized>(
    store: &mut S,
    high_score: u64,
) -> Result<(), StoreError> {
    let best = read_high_score(store).max(high_score);
    store.set(keys::HIGH_SCORE, SaveValue::Int(best as i64))
}

/// The RNG checkpoint, if both halves are present.
fn read_rng<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<GameRngState>, SaveError> {
    if !store.contains(keys::RNG_SEED) || !store.contains(keys::RNG_POS) {
        return Ok(None);
    }
    Ok(Some(GameRngState {
        seed: parsed(store, keys::RNG_SEED)?,
        word_pos: parsed(store, keys::RNG_POS)?,
    }))
}

fn parsed<S, T>(store: &S, key: &'static str) -> Result<T, SaveError>
where
    S: KeyValueStore + ?Sized,
    T: std::str::FromStr,
{
    let value = text(store, key)?;
    value
        .parse()
        .map_err(|_| SaveError::InvalidValue { key, value })
}

fn required<S, T>(
    store: &S,
    key: &'static str,
    read: impl Fn(&SaveValue) -> Option<T>,
) -> Result<T, SaveError>
where
    S: KeyValueStore + ?Sized,
{
    let value = store.get(key).ok_or(SaveError::MissingKey(key))?;
    read(value).ok_or_else(|| SaveError::InvalidValue {
        key,
        value: format!("{value:?}"),
    })
}

fn text<S: KeyValueStore + ?Sized>(store: &S, key: &'static str) -> Result<String, SaveError> {
    required(store, key, |v| v.as_text().map(str::to_string))
}

fn non_negative<S: KeyValueStore + ?Sized>(store: &S, key: &'static str) -> Result<u64, SaveError> {
    let value = required(store, key, SaveValue::as_int)?;
    u64::try_from(value).map_err(|_| SaveError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coord;
    use crate::grid::Token;
    use crate::persist::MemoryStore;

    fn sample() -> SaveGame {
        let mut grid = Grid::new(9);
        grid.place(Coord::new(2, 3), Token::normal(4)).unwrap();
        grid.get_mut(Coord::new(7, 7))
            .unwrap()
            .set_preview(Token::ghost(1));
        SaveGame::capture(&grid, 93.25, 340, 12, true, 900).with_rng(GameRngState {
            seed: u64::MAX,
            word_pos: 1 << 70,
        })
    }

    #[test]
    fn test_write_then_read() {
        let mut store = MemoryStore::new();
        let save = sample();
        save.write_to(&mut store).unwrap();

        let loaded = SaveGame::read_from(&store).unwrap();
        assert_eq!(loaded, save);
        let grid = loaded.grid(9, 7).unwrap();
        assert!(grid[Coord::new(7, 7)].is_preview());
    }

    #[test]
    fn test_missing_key() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        store.remove(keys::TURN).unwrap();
        assert_eq!(
            SaveGame::read_from(&store).unwrap_err(),
            SaveError::MissingKey("turn")
        );
    }

    #[test]
    fn test_wrong_value_type() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        store.set(keys::SCORE, SaveValue::Text("lots".into())).unwrap();
        assert!(matches!(
            SaveGame::read_from(&store).unwrap_err(),
            SaveError::InvalidValue { key: "score", .. }
        ));
    }

    #[test]
    fn test_save_without_rng_reads_none() {
        let mut store = MemoryStore::new();
        let mut save = sample();
        save.rng = None;
        save.write_to(&mut store).unwrap();
        assert!(!store.contains(keys::RNG_POS));
        assert_eq!(SaveGame::read_from(&store).unwrap().rng, None);
    }

    #[test]
    fn test_malformed_rng_position() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        store.set(keys::RNG_POS, SaveValue::Text("-3".into())).unwrap();
        assert!(matches!(
            SaveGame::read_from(&store).unwrap_err(),
            SaveError::InvalidValue { key: "rng_pos", .. }
        ));
    }

    #[test]
    fn test_clear_keeps_high_score() {
        let mut store = MemoryStore::new();
        sample().write_to(&mut store).unwrap();
        SaveGame::clear(&mut store).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(read_high_score(&store), 900);
    }

    #[test]
    fn test_high_score_never_decreases() {
        let mut store = MemoryStore::new();
        write_high_score(&mut store, 500).unwrap();
        write_high_score(&mut store, 200).unwrap();
        assert_eq!(read_high_score(&store), 500);
    }
}
