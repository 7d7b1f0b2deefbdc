//! Discrete board geometry

use super::action::Direction;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A cell on the game grid
///
/// Coordinates are signed so a head that has just left the board can still
/// be represented and reported as a wall collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one step in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Fixed-size board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a cell is within the grid bounds
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width as i32 && cell.y >= 0 && cell.y < self.height as i32
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// The cell the snake starts on
    pub fn center(&self) -> Cell {
        Cell::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Uniformly random in-bounds cell
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let x = rng.gen_range(0..self.width) as i32;
        let y = rng.gen_range(0..self.height) as i32;
        Cell::new(x, y)
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_by(1, 0), Cell::new(6, 5));
        assert_eq!(cell.moved_by(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.moved_in_direction(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.moved_in_direction(Direction::Up), Cell::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20, 20);

        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(19, 19)));
        assert!(!grid.contains(Cell::new(-1, 0)));
        assert!(!grid.contains(Cell::new(20, 0)));
        assert!(!grid.contains(Cell::new(0, 20)));
    }

    #[test]
    fn test_center() {
        assert_eq!(Grid::new(40, 30).center(), Cell::new(20, 15));
        assert_eq!(Grid::new(10, 10).center(), Cell::new(5, 5));
    }

    #[test]
    fn test_random_cell_in_bounds() {
        let grid = Grid::new(7, 3);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(grid.contains(grid.random_cell(&mut rng)));
        }
    }

    #[test]
    fn test_cells_cover_grid() {
        let grid = Grid::new(4, 3);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[11], Cell::new(3, 2));
    }
}
