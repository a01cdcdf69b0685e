//! Generic dense grid for per-cell data

use crate::core::types::GridPos;

/// Row-major 2D grid addressed by signed cell coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        match self.index(pos) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    /// Write a value; returns false when `pos` is outside the grid
    #[inline]
    pub fn set(&mut self, pos: GridPos, value: T) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Clamp a coordinate into the grid
    pub fn clamp(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            pos.x.clamp(0, self.width.saturating_sub(1) as i32),
            pos.y.clamp(0, self.height.saturating_sub(1) as i32),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (GridPos::new((i % width) as i32, (i / width) as i32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_access_is_none() {
        let grid: Grid<u8> = Grid::new(3, 2);
        assert!(grid.get(GridPos::new(2, 1)).is_some());
        assert!(grid.get(GridPos::new(3, 1)).is_none());
        assert!(grid.get(GridPos::new(0, -1)).is_none());
    }

    #[test]
    fn test_set_and_iter_positions() {
        let mut grid: Grid<u8> = Grid::new(3, 2);
        assert!(grid.set(GridPos::new(1, 1), 7));
        assert!(!grid.set(GridPos::new(5, 5), 7));
        let hit: Vec<_> = grid.iter().filter(|(_, v)| **v == 7).map(|(p, _)| p).collect();
        assert_eq!(hit, vec![GridPos::new(1, 1)]);
    }

    #[test]
    fn test_clamp() {
        let grid: Grid<u8> = Grid::new(4, 4);
        assert_eq!(grid.clamp(GridPos::new(-2, 9)), GridPos::new(0, 3));
    }
}
