//! Save data.
//!
//! A game in progress is saved as a handful of keys in a
//! [`KeyValueStore`]: the board as two flat strings plus the elapsed time,
//! score, turn count, and time attack flag. The high score is stored under
//! its own key and outlives any single game.
//!
//! Malformed save data is a [`SaveError`](crate::core::SaveError); callers
//! treat it as "no saved game" and start fresh.

pub mod encoding;
pub mod save;
pub mod store;

pub use encoding::{decode_grid, encode_grid};
pub use save::{keys, read_high_score, write_high_score, SaveGame};
pub use store::{FileStore, KeyValueStore, MemoryStore, SaveValue};
