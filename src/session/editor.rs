//! Board editor for debugging positions.
//!
//! Edits write active tokens straight onto the board while keeping the
//! empty set and preview queue in step. Nothing is matched while editing;
//! [`BoardSession::hit_check_all`] resolves whatever lines the edits left
//! once the editor closes.

use tracing::debug;

use crate::core::{Coord, GridError, RandomSource};
use crate::grid::Token;
use crate::matching::MatchTrigger;

use super::board::{BoardSession, Clearance};

impl<R: RandomSource> BoardSession<R> {
    /// Put `token` on `coord` as an active token, replacing whatever was
    /// there. An empty token clears the cell.
    pub fn edit_cell(&mut self, coord: Coord, token: Token) -> Result<(), GridError> {
        self.grid_mut().get_mut(coord)?.set_active(token);
        self.previews_mut().retain(|&c| c != coord);
        if token.is_empty() {
            self.empty_mut().insert(coord);
        } else {
            self.empty_mut().remove(coord);
        }
        Ok(())
    }

    /// Step the kind at `coord` by `delta`, wrapping around. The color is
    /// kept when both kinds carry one; otherwise colored kinds start at 0.
    pub fn cycle_kind(&mut self, coord: Coord, delta: i32) -> Result<Token, GridError> {
        let current = self.grid().get(coord)?.token();
        let kind = current.kind().cycle(delta);
        let token = Token::new(kind, current.color().unwrap_or(0));
        self.edit_cell(coord, token)?;
        Ok(token)
    }

    /// Step the color at `coord` by `delta` through the palette, wrapping
    /// around. Colorless tokens are left alone.
    pub fn cycle_color(&mut self, coord: Coord, delta: i32) -> Result<Token, GridError> {
        let current = self.grid().get(coord)?.token();
        let Some(color) = current.color() else {
            return Ok(current);
        };
        let count = i32::from(self.config().color_count);
        let next = (i32::from(color) + delta).rem_euclid(count) as u8;
        let token = Token::new(current.kind(), next);
        self.edit_cell(coord, token)?;
        Ok(token)
    }

    /// Check every active token for lines, row by row, clearing as it goes.
    pub fn hit_check_all(&mut self) -> Vec<Clearance> {
        let size = self.grid().size();
        let mut hits = Vec::new();
        for coord in Coord::all(size) {
            if !self.grid()[coord].is_active() {
                continue;
            }
            if let Some(hit) = self.hit_check(coord, MatchTrigger::Population) {
                hits.push(hit);
            }
        }
        debug!(hits = hits.len(), "editor hit check");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::grid::TokenKind;

    #[test]
    fn test_edit_cell_tracks_empty_set() {
        let mut s = BoardSession::new(GameConfig::default());
        let c = Coord::new(3, 3);
        s.edit_cell(c, Token::normal(1)).unwrap();
        assert!(!s.is_empty_cell(c));
        assert_eq!(s.empty_count(), 80);

        s.edit_cell(c, Token::EMPTY).unwrap();
        assert!(s.is_empty_cell(c));
        assert_eq!(s.empty_count(), 81);
    }

    #[test]
    fn test_edit_replaces_preview() {
        let mut s = BoardSession::new(GameConfig::default());
        let report = s.populate(2, 1);
        let target = report.placed[0];

        s.edit_cell(target, Token::colorless(TokenKind::Block)).unwrap();
        assert_eq!(s.previews(), &report.placed[1..]);
        assert!(s.grid()[target].is_active());
    }

    #[test]
    fn test_cycle_kind_wraps() {
        let mut s = BoardSession::new(GameConfig::default());
        let c = Coord::new(0, 0);

        let token = s.cycle_kind(c, 1).unwrap();
        assert_eq!(token, Token::normal(0));

        let token = s.cycle_kind(c, -2).unwrap();
        assert_eq!(token.kind(), TokenKind::Block);

        let token = s.cycle_kind(c, 1).unwrap();
        assert!(token.is_empty());
        assert!(s.is_empty_cell(c));
    }

    #[test]
    fn test_cycle_color_wraps() {
        let mut s = BoardSession::new(GameConfig::default());
        let c = Coord::new(1, 1);
        s.edit_cell(c, Token::ghost(6)).unwrap();

        assert_eq!(s.cycle_color(c, 1).unwrap(), Token::ghost(0));
        assert_eq!(s.cycle_color(c, -1).unwrap(), Token::ghost(6));

        s.edit_cell(c, Token::colorless(TokenKind::Wild)).unwrap();
        assert_eq!(s.cycle_color(c, 1).unwrap(), Token::colorless(TokenKind::Wild));
    }

    #[test]
    fn test_hit_check_all_clears_edited_lines() {
        let mut s = BoardSession::new(GameConfig::default());
        for y in 0..5 {
            s.edit_cell(Coord::new(6, y), Token::normal(4)).unwrap();
        }
        s.edit_cell(Coord::new(0, 8), Token::normal(4)).unwrap();

        let hits = s.hit_check_all();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].cleared_count(), 5);
        assert_eq!(s.grid().active_count(), 1);
    }
}
