//! Best-first search over the 4-connected grid.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::Coord;
use crate::grid::{Cell, Grid, TokenKind};

/// Direction of travel between orthogonal neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    /// Source expansion order.
    pub const ALL: [Heading; 4] = [Heading::Left, Heading::Right, Heading::Up, Heading::Down];

    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
        }
    }

    /// Heading of the step `from -> to`, if they are orthogonal neighbors.
    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (-1, 0) => Some(Heading::Left),
            (1, 0) => Some(Heading::Right),
            (0, -1) => Some(Heading::Up),
            (0, 1) => Some(Heading::Down),
            _ => None,
        }
    }

    /// Straight on first, then the two sideways turns. Never the reverse.
    #[must_use]
    pub const fn continuations(self) -> [Heading; 3] {
        match self {
            Heading::Left => [Heading::Left, Heading::Up, Heading::Down],
            Heading::Right => [Heading::Right, Heading::Up, Heading::Down],
            Heading::Up => [Heading::Up, Heading::Left, Heading::Right],
            Heading::Down => [Heading::Down, Heading::Left, Heading::Right],
        }
    }
}

/// Computes the path a selected token travels.
///
/// The search keeps its cost/predecessor bookkeeping on the grid's cells,
/// so it needs the grid exclusively for the duration of a run and resets
/// that scratch state first.
pub struct PathFinder;

impl PathFinder {
    /// Whether `cell` stops a token of kind `mover` from passing through.
    ///
    /// Any active token blocks, unless the mover is a ghost.
    #[must_use]
    pub fn is_blocking(cell: &Cell, mover: TokenKind) -> bool {
        mover != TokenKind::Ghost && cell.is_active()
    }

    /// Shortest path from `src` to `dest` for the token currently at `src`.
    ///
    /// The returned path excludes `src` and ends with `dest`. `None` means no
    /// path exists (or either end is off the board); that is an expected
    /// outcome, not an error.
    pub fn find_path(grid: &mut Grid, src: Coord, dest: Coord) -> Option<Vec<Coord>> {
        let mover = grid.get(src).ok()?.kind();
        grid.get(dest).ok()?;
        if src == dest {
            return None;
        }

        for cell in grid.cells_mut() {
            cell.reset_scratch();
        }
        grid[src].cost = 0;

        let size = grid.size();
        let mut closed = vec![false; grid.cell_count()];
        let mut queued = vec![false; grid.cell_count()];
        // Insertion-ordered open set; ties on f resolve to the earliest entry.
        let mut open: Vec<Coord> = vec![src];
        queued[src.index(size)] = true;

        while let Some(position) = Self::lowest_f(grid, &open, dest) {
            let current = open.remove(position);
            queued[current.index(size)] = false;

            if current == dest {
                let path = Self::make_path(grid, src, dest);
                trace!(%src, %dest, len = path.len(), "path found");
                return Some(path);
            }
            closed[current.index(size)] = true;

            let g = grid[current].cost + 1;
            for heading in Self::expansion_order(grid, current) {
                let (dx, dy) = heading.delta();
                let next = current.offset(dx, dy);
                if !grid.contains(next) || closed[next.index(size)] {
                    continue;
                }
                let cell = &mut grid[next];
                if Self::is_blocking(cell, mover) {
                    continue;
                }
                if g < cell.cost {
                    cell.cost = g;
                    cell.predecessor = Some(current);
                }
                if !queued[next.index(size)] {
                    queued[next.index(size)] = true;
                    open.push(next);
                }
            }
        }

        trace!(%src, %dest, "no path");
        None
    }

    /// Index into `open` of the entry with the lowest `g + h`.
    fn lowest_f(grid: &Grid, open: &[Coord], dest: Coord) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &coord) in open.iter().enumerate() {
            let f = grid[coord].cost.saturating_add(coord.manhattan(dest));
            if best.map_or(true, |(_, best_f)| f < best_f) {
                best = Some((i, f));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Headings to try from `current`: all four from the source, otherwise
    /// straight on and sideways relative to how `current` was reached.
    fn expansion_order(grid: &Grid, current: Coord) -> SmallVec<[Heading; 4]> {
        let incoming = grid[current]
            .predecessor
            .and_then(|prev| Heading::between(prev, current));
        match incoming {
            Some(heading) => SmallVec::from_slice(&heading.continuations()),
            None => SmallVec::from_slice(&Heading::ALL),
        }
    }

    fn make_path(grid: &Grid, src: Coord, dest: Coord) -> Vec<Coord> {
        let mut path = Vec::new();
        let mut current = dest;
        while current != src {
            path.push(current);
            match grid[current].predecessor {
                Some(prev) => current = prev,
                None => break,
            }
        }
        path.reverse();
        path
    }
}
