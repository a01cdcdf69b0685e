//! Battlefield terrain: a fixed grid of land and obstacle cells
//!
//! The field knows nothing about units. Occupancy by living units is layered
//! on top by `Game::is_available`.

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;
use crate::spatial::grid::Grid;

/// Terrain of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Land,
    Obstacle,
}

/// Bounded grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    cells: Grid<Cell>,
}

impl Field {
    /// All-land field
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        self.cells.contains(pos)
    }

    /// Terrain at `pos`, `None` outside the field
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    pub fn is_obstacle(&self, pos: GridPos) -> bool {
        matches!(self.cell(pos), Some(Cell::Obstacle))
    }

    /// Setup-time terrain edit; returns false outside the field
    pub fn set_cell(&mut self, pos: GridPos, cell: Cell) -> bool {
        self.cells.set(pos, cell)
    }

    pub fn place_obstacle(&mut self, pos: GridPos) -> bool {
        self.set_cell(pos, Cell::Obstacle)
    }

    /// Clamp a coordinate onto the field
    pub fn clamp(&self, pos: GridPos) -> GridPos {
        self.cells.clamp(pos)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| **cell == Cell::Obstacle)
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_all_land() {
        let field = Field::new(5, 4);
        assert_eq!(field.cell(GridPos::new(4, 3)), Some(Cell::Land));
        assert_eq!(field.obstacles().count(), 0);
    }

    #[test]
    fn test_bounds_support_non_square_fields() {
        let field = Field::new(5, 2);
        assert!(field.in_bounds(GridPos::new(4, 1)));
        assert!(!field.in_bounds(GridPos::new(1, 4)));
        assert!(!field.in_bounds(GridPos::new(-1, 0)));
        assert_eq!(field.cell(GridPos::new(5, 0)), None);
    }

    #[test]
    fn test_obstacle_placement() {
        let mut field = Field::new(3, 3);
        assert!(field.place_obstacle(GridPos::new(1, 1)));
        assert!(!field.place_obstacle(GridPos::new(3, 3)));
        assert!(field.is_obstacle(GridPos::new(1, 1)));
        assert_eq!(field.obstacles().collect::<Vec<_>>(), vec![GridPos::new(1, 1)]);

        field.set_cell(GridPos::new(1, 1), Cell::Land);
        assert!(!field.is_obstacle(GridPos::new(1, 1)));
    }
}
