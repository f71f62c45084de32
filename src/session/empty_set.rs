//! Indexed set of empty cells with O(1) insert, remove, and uniform pick.

use crate::core::{Coord, RandomSource};

/// Set of board coordinates whose cell holds no token.
///
/// Backed by a dense member list plus a per-cell slot index, so removing an
/// arbitrary member is a swap-remove.
#[derive(Clone, Debug)]
pub struct EmptySet {
    size: usize,
    members: Vec<Coord>,
    slots: Vec<Option<usize>>,
}

impl EmptySet {
    /// Create an empty set for a `size × size` board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            members: Vec::with_capacity(size * size),
            slots: vec![None; size * size],
        }
    }

    /// Create a set containing every cell of the board.
    #[must_use]
    pub fn full(size: usize) -> Self {
        let mut set = Self::new(size);
        set.fill();
        set
    }

    /// Insert every cell of the board.
    pub fn fill(&mut self) {
        self.members.clear();
        for (i, coord) in Coord::all(self.size).enumerate() {
            self.members.push(coord);
            self.slots[i] = Some(i);
        }
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.members.clear();
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size) && self.slots[coord.index(self.size)].is_some()
    }

    /// Insert a coordinate. Returns false if it was already present.
    pub fn insert(&mut self, coord: Coord) -> bool {
        debug_assert!(coord.in_bounds(self.size), "{coord} outside board");
        let index = coord.index(self.size);
        if self.slots[index].is_some() {
            return false;
        }
        self.slots[index] = Some(self.members.len());
        self.members.push(coord);
        true
    }

    /// Remove a coordinate. Returns false if it was not present.
    pub fn remove(&mut self, coord: Coord) -> bool {
        if !coord.in_bounds(self.size) {
            return false;
        }
        let Some(slot) = self.slots[coord.index(self.size)].take() else {
            return false;
        };
        self.members.swap_remove(slot);
        if let Some(moved) = self.members.get(slot) {
            self.slots[moved.index(self.size)] = Some(slot);
        }
        true
    }

    /// Remove and return a uniformly chosen member.
    pub fn take_random<R: RandomSource>(&mut self, rng: &mut R) -> Option<Coord> {
        if self.members.is_empty() {
            return None;
        }
        let coord = self.members[rng.below(self.members.len() as u32) as usize];
        self.remove(coord);
        Some(coord)
    }

    /// Iterate over members in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;

    #[test]
    fn test_full_and_clear() {
        let mut set = EmptySet::full(9);
        assert_eq!(set.len(), 81);
        assert!(set.contains(Coord::new(8, 8)));

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(Coord::new(0, 0)));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = EmptySet::new(5);
        assert!(set.insert(Coord::new(1, 1)));
        assert!(!set.insert(Coord::new(1, 1)));
        assert!(set.insert(Coord::new(2, 3)));
        assert!(set.insert(Coord::new(4, 4)));
        assert_eq!(set.len(), 3);

        assert!(set.remove(Coord::new(1, 1)));
        assert!(!set.remove(Coord::new(1, 1)));
        assert!(!set.remove(Coord::new(7, 7)));

        // The swapped member must still be removable.
        assert!(set.remove(Coord::new(4, 4)));
        assert!(set.contains(Coord::new(2, 3)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_take_random_drains() {
        let mut set = EmptySet::full(5);
        let mut rng = GameRng::new(1);
        let mut taken = Vec::new();
        while let Some(coord) = set.take_random(&mut rng) {
            assert!(!set.contains(coord));
            taken.push(coord);
        }
        taken.sort();
        taken.dedup();
        assert_eq!(taken.len(), 25);
    }
}
