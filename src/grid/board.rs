//! The square cell grid.

use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use super::cell::Cell;
use super::token::Token;
use crate::core::{Coord, GridError};

/// Orthogonal neighbor coordinates, at most four.
pub type Neighbors = SmallVec<[Coord; 4]>;

/// Fixed `size × size` array of cells.
///
/// Cells are created once and never relocate; a cell's coordinate is its
/// identity. Storage is row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Grid must have at least one cell");
        assert!(size <= i32::MAX as usize, "Grid size must fit in i32");

        Self {
            size,
            cells: Coord::all(size).map(Cell::new).collect(),
        }
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size)
    }

    fn check(&self, coord: Coord) -> Result<usize, GridError> {
        if self.contains(coord) {
            Ok(coord.index(self.size))
        } else {
            Err(GridError::OutOfRange {
                coord,
                size: self.size,
            })
        }
    }

    /// Look up a cell.
    pub fn get(&self, coord: Coord) -> Result<&Cell, GridError> {
        let index = self.check(coord)?;
        Ok(&self.cells[index])
    }

    /// Look up a cell mutably.
    pub fn get_mut(&mut self, coord: Coord) -> Result<&mut Cell, GridError> {
        let index = self.check(coord)?;
        Ok(&mut self.cells[index])
    }

    /// In-range orthogonal neighbors in the order left, right, up, down.
    #[must_use]
    pub fn neighbors4(&self, coord: Coord) -> Neighbors {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(|(dx, dy)| coord.offset(dx, dy))
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Number of cells holding an active token.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    /// Place an active token. Convenience for setting up positions.
    pub fn place(&mut self, coord: Coord, token: Token) -> Result<(), GridError> {
        self.get_mut(coord)?.set_active(token);
        Ok(())
    }
}

impl Index<Coord> for Grid {
    type Output = Cell;

    /// Panics on an out-of-range coordinate.
    fn index(&self, coord: Coord) -> &Cell {
        match self.get(coord) {
            Ok(cell) => cell,
            Err(err) => panic!("{err}"),
        }
    }
}

impl IndexMut<Coord> for Grid {
    fn index_mut(&mut self, coord: Coord) -> &mut Cell {
        let size = self.size;
        match self.get_mut(coord) {
            Ok(cell) => cell,
            Err(_) => panic!("{}", GridError::OutOfRange { coord, size }),
        }
    }
}
