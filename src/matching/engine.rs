//! Line detection through a single origin cell.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::Coord;
use crate::grid::{Cell, Grid, TokenKind};

/// Minimum run length (origin included) that clears a line.
pub const MIN_LINE: usize = 5;

/// The four line axes through a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// `\` diagonal.
    Diagonal,
    /// `/` diagonal.
    AntiDiagonal,
    Vertical,
    Horizontal,
}

impl Axis {
    /// Axes in the order they are checked.
    pub const ALL: [Axis; 4] = [
        Axis::Diagonal,
        Axis::AntiDiagonal,
        Axis::Vertical,
        Axis::Horizontal,
    ];

    /// Unit step along the axis; the walk goes both ways from the origin.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Axis::Diagonal => (1, 1),
            Axis::AntiDiagonal => (1, -1),
            Axis::Vertical => (0, 1),
            Axis::Horizontal => (1, 0),
        }
    }
}

/// What caused the match check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTrigger {
    /// The origin token was just moved there by the player.
    PlayerMove,
    /// The origin token was just populated or actualized.
    Population,
}

/// One qualifying line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub axis: Axis,
    /// Member cells. The origin appears only in the first group.
    pub cells: SmallVec<[Coord; 9]>,
}

/// Points awarded for clearing one token of `kind`.
#[must_use]
pub const fn score_value(kind: TokenKind) -> u32 {
    match kind {
        TokenKind::Wild => 30,
        TokenKind::Block => 100,
        _ => 10,
    }
}

/// Pure line detection over a grid.
pub struct MatchEngine;

impl MatchEngine {
    /// Every line of at least [`MIN_LINE`] matching cells through `origin`.
    ///
    /// Returns an empty vec when nothing qualifies, including when `origin`
    /// is out of range or not an active token.
    #[must_use]
    pub fn find_lines(grid: &Grid, origin: Coord, trigger: MatchTrigger) -> Vec<MatchGroup> {
        let Ok(origin_cell) = grid.get(origin) else {
            return Vec::new();
        };
        if !origin_cell.is_active() {
            return Vec::new();
        }

        let sweeping = trigger == MatchTrigger::PlayerMove && origin_cell.kind().is_cleaner();
        let mut groups: Vec<MatchGroup> = Vec::new();

        for axis in Axis::ALL {
            let run = if sweeping {
                Self::sweep_run(grid, origin_cell, axis)
            } else {
                Self::color_run(grid, origin_cell, axis)
            };

            if run.len() + 1 >= MIN_LINE {
                trace!(%origin, ?axis, len = run.len() + 1, "line qualifies");
                groups.push(MatchGroup { axis, cells: run });
            }
        }

        if let Some(first) = groups.first_mut() {
            first.cells.push(origin);
        }
        groups
    }

    /// Union of all cells across `groups`, deduplicated, in first-seen order.
    #[must_use]
    pub fn union(groups: &[MatchGroup]) -> Vec<Coord> {
        let mut seen = FxHashSet::default();
        groups
            .iter()
            .flat_map(|g| g.cells.iter().copied())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Walk both directions along `axis` while the next cell extends the
    /// color run. The common color persists across both directions.
    fn color_run(grid: &Grid, origin: &Cell, axis: Axis) -> SmallVec<[Coord; 9]> {
        let mut common = match origin.kind() {
            TokenKind::Normal | TokenKind::Ghost => origin.token().color(),
            TokenKind::Wild => None,
            // Colorless obstacles and cleaners start no color run.
            _ => return SmallVec::new(),
        };

        let (dx, dy) = axis.step();
        let mut run = SmallVec::new();
        for (sx, sy) in [(-dx, -dy), (dx, dy)] {
            let mut at = origin.coord().offset(sx, sy);
            while let Ok(cell) = grid.get(at) {
                if !Self::extends_run(cell, &mut common) {
                    break;
                }
                run.push(at);
                at = at.offset(sx, sy);
            }
        }
        run
    }

    /// Cleaner moved by the player: every cell on its own row (horizontal)
    /// or column (vertical) belongs to the line, occupied or not.
    fn sweep_run(grid: &Grid, origin: &Cell, axis: Axis) -> SmallVec<[Coord; 9]> {
        let swept = match origin.kind() {
            TokenKind::CleanerHorizontal => Axis::Horizontal,
            _ => Axis::Vertical,
        };
        if axis != swept {
            return SmallVec::new();
        }

        let (dx, dy) = axis.step();
        let mut run = SmallVec::new();
        for (sx, sy) in [(-dx, -dy), (dx, dy)] {
            let mut at = origin.coord().offset(sx, sy);
            while grid.contains(at) {
                run.push(at);
                at = at.offset(sx, sy);
            }
        }
        run
    }

    /// Matching predicate for the next cell of a color run.
    ///
    /// Previews, empties, cleaners, and blocks never match. Wild matches
    /// anything colored. A colored cell fixes the common color if none is
    /// established yet, otherwise it must equal it.
    fn extends_run(cell: &Cell, common: &mut Option<u8>) -> bool {
        if !cell.is_active() {
            return false;
        }
        match cell.kind() {
            TokenKind::Wild => true,
            TokenKind::Normal | TokenKind::Ghost => {
                let Some(color) = cell.token().color() else {
                    return false;
                };
                match *common {
                    Some(established) => established == color,
                    None => {
                        *common = Some(color);
                        true
                    }
                }
            }
            TokenKind::Empty
            | TokenKind::CleanerHorizontal
            | TokenKind::CleanerVertical
            | TokenKind::Block => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Token;

    fn row(grid: &mut Grid, y: i32, xs: std::ops::Range<i32>, token: Token) {
        for x in xs {
            grid.place(Coord::new(x, y), token).unwrap();
        }
    }

    #[test]
    fn test_score_values() {
        assert_eq!(score_value(TokenKind::Normal), 10);
        assert_eq!(score_value(TokenKind::Ghost), 10);
        assert_eq!(score_value(TokenKind::CleanerVertical), 10);
        assert_eq!(score_value(TokenKind::Wild), 30);
        assert_eq!(score_value(TokenKind::Block), 100);
    }

    #[test]
    fn test_exactly_five_horizontal() {
        let mut grid = Grid::new(9);
        row(&mut grid, 4, 2..7, Token::normal(1));

        let groups = MatchEngine::find_lines(&grid, Coord::new(4, 4), MatchTrigger::Population);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].axis, Axis::Horizontal);

        let mut cells = groups[0].cells.to_vec();
        cells.sort();
        let expected: Vec<_> = (2..7).map(|x| Coord::new(x, 4)).collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_four_is_not_a_line() {
        let mut grid = Grid::new(9);
        row(&mut grid, 0, 0..4, Token::normal(2));

        let groups = MatchEngine::find_lines(&grid, Coord::new(0, 0), MatchTrigger::PlayerMove);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_run_stops_at_other_color() {
        let mut grid = Grid::new(9);
        row(&mut grid, 0, 0..4, Token::normal(2));
        grid.place(Coord::new(4, 0), Token::normal(3)).unwrap();
        grid.place(Coord::new(5, 0), Token::normal(2)).unwrap();

        assert!(MatchEngine::find_lines(&grid, Coord::new(1, 0), MatchTrigger::Population).is_empty());
    }

    #[test]
    fn test_wild_bridges_color() {
        let mut grid = Grid::new(9);
        row(&mut grid, 2, 0..2, Token::normal(5));
        grid.place(Coord::new(2, 2), Token::colorless(TokenKind::Wild)).unwrap();
        row(&mut grid, 2, 3..5, Token::normal(5));

        let groups = MatchEngine::find_lines(&grid, Coord::new(4, 2), MatchTrigger::Population);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].cells.len(), 5);
    }

    #[test]
    fn test_wild_origin_takes_first_color() {
        let mut grid = Grid::new(9);
        grid.place(Coord::new(4, 4), Token::colorless(TokenKind::Wild)).unwrap();
        // Two reds to the left, three blues to the right: the left walk
        // fixes red, so blue must not extend the run.
        row(&mut grid, 4, 2..4, Token::normal(0));
        row(&mut grid, 4, 5..8, Token::normal(1));

        assert!(MatchEngine::find_lines(&grid, Coord::new(4, 4), MatchTrigger::Population).is_empty());

        row(&mut grid, 4, 5..8, Token::normal(0));
        let groups = MatchEngine::find_lines(&grid, Coord::new(4, 4), MatchTrigger::Population);
        assert_eq!(groups[0].cells.len(), 6);
    }

    #[test]
    fn test_ghost_matches_by_color() {
        let mut grid = Grid::new(9);
        row(&mut grid, 1, 0..4, Token::normal(6));
        grid.place(Coord::new(4, 1), Token::ghost(6)).unwrap();

        let groups = MatchEngine::find_lines(&grid, Coord::new(4, 1), MatchTrigger::Population);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_preview_breaks_run() {
        let mut grid = Grid::new(9);
        row(&mut grid, 0, 0..5, Token::normal(1));
        grid.get_mut(Coord::new(2, 0)).unwrap().set_preview(Token::normal(1));

        assert!(MatchEngine::find_lines(&grid, Coord::new(0, 0), MatchTrigger::Population).is_empty());
    }

    #[test]
    fn test_block_never_matches() {
        let mut grid = Grid::new(9);
        row(&mut grid, 0, 0..5, Token::normal(1));
        grid.place(Coord::new(2, 0), Token::colorless(TokenKind::Block)).unwrap();
        assert!(MatchEngine::find_lines(&grid, Coord::new(0, 0), MatchTrigger::Population).is_empty());

        // Block as origin starts no run.
        assert!(MatchEngine::find_lines(&grid, Coord::new(2, 0), MatchTrigger::PlayerMove).is_empty());

        // Block next to a wild is still not bridged.
        let mut grid = Grid::new(9);
        row(&mut grid, 0, 0..3, Token::normal(1));
        grid.place(Coord::new(3, 0), Token::colorless(TokenKind::Wild)).unwrap();
        grid.place(Coord::new(4, 0), Token::colorless(TokenKind::Block)).unwrap();
        assert!(MatchEngine::find_lines(&grid, Coord::new(0, 0), MatchTrigger::Population).is_empty());
    }

    #[test]
    fn test_cleaner_sweeps_row_on_player_move() {
        let mut grid = Grid::new(9);
        grid.place(Coord::new(3, 6), Token::colorless(TokenKind::CleanerHorizontal)).unwrap();
        grid.place(Coord::new(0, 6), Token::normal(2)).unwrap();

        let groups = MatchEngine::find_lines(&grid, Coord::new(3, 6), MatchTrigger::PlayerMove);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].axis, Axis::Horizontal);
        assert_eq!(groups[0].cells.len(), 9);
        assert!(groups[0].cells.iter().all(|c| c.y == 6));
    }

    #[test]
    fn test_vertical_cleaner_sweeps_column() {
        let mut grid = Grid::new(9);
        grid.place(Coord::new(5, 0), Token::colorless(TokenKind::CleanerVertical)).unwrap();

        let groups = MatchEngine::find_lines(&grid, Coord::new(5, 0), MatchTrigger::PlayerMove);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].axis, Axis::Vertical);
        assert!(groups[0].cells.iter().all(|c| c.x == 5));
    }

    #[test]
    fn test_cleaner_inert_on_population() {
        let mut grid = Grid::new(9);
        grid.place(Coord::new(3, 6), Token::colorless(TokenKind::CleanerHorizontal)).unwrap();

        assert!(MatchEngine::find_lines(&grid, Coord::new(3, 6), MatchTrigger::Population).is_empty());
    }

    #[test]
    fn test_inactive_origin() {
        let grid = Grid::new(9);
        assert!(MatchEngine::find_lines(&grid, Coord::new(3, 3), MatchTrigger::Population).is_empty());
        assert!(MatchEngine::find_lines(&grid, Coord::new(30, 3), MatchTrigger::Population).is_empty());
    }

    #[test]
    fn test_union_dedups() {
        let a = MatchGroup {
            axis: Axis::Horizontal,
            cells: SmallVec::from_slice(&[Coord::new(0, 0), Coord::new(1, 0)]),
        };
        let b = MatchGroup {
            axis: Axis::Vertical,
            cells: SmallVec::from_slice(&[Coord::new(0, 0), Coord::new(0, 1)]),
        };
        assert_eq!(
            MatchEngine::union(&[a, b]),
            vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1)]
        );
    }
}
