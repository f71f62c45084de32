//! Board coordinates.
//!
//! A `Coord` is the sole identity of a cell. Coordinates are 0-based with
//! `x` growing to the right (column) and `y` growing downwards (row).

use serde::{Deserialize, Serialize};

/// Cell coordinate on a square board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column, 0-based.
    pub x: i32,
    /// Row, 0-based.
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub const fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Check whether this coordinate lies within `[0, size)²`.
    #[must_use]
    pub const fn in_bounds(self, size: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < size && (self.y as usize) < size
    }

    /// Row-major index on a board of side `size`.
    ///
    /// Only meaningful when `in_bounds(size)` holds.
    #[must_use]
    pub const fn index(self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    /// Inverse of [`Coord::index`].
    #[must_use]
    pub const fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: (index % size) as i32,
            y: (index / size) as i32,
        }
    }

    /// Iterate over every coordinate of a `size × size` board in row-major order.
    pub fn all(size: usize) -> impl Iterator<Item = Coord> {
        (0..size * size).map(move |i| Coord::from_index(i, size))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(8, 8)), 16);
        assert_eq!(Coord::new(3, 5).manhattan(Coord::new(1, 6)), 3);
        assert_eq!(Coord::new(2, 2).manhattan(Coord::new(2, 2)), 0);
    }

    #[test]
    fn test_in_bounds() {
        assert!(Coord::new(0, 0).in_bounds(9));
        assert!(Coord::new(8, 8).in_bounds(9));
        assert!(!Coord::new(9, 0).in_bounds(9));
        assert!(!Coord::new(0, -1).in_bounds(9));
    }

    #[test]
    fn test_index_round_trip() {
        for coord in Coord::all(9) {
            assert_eq!(Coord::from_index(coord.index(9), 9), coord);
        }
        assert_eq!(Coord::new(2, 1).index(9), 11);
    }

    #[test]
    fn test_all_is_row_major() {
        let coords: Vec<_> = Coord::all(3).collect();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], Coord::new(0, 0));
        assert_eq!(coords[1], Coord::new(1, 0));
        assert_eq!(coords[3], Coord::new(0, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Coord::new(4, 7)), "(4, 7)");
    }
}
