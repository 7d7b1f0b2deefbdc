//! Food entity - a single pellet placed on a free cell

use super::grid::{Cell, Grid};
use rand::Rng;
use std::collections::HashSet;

/// The pellet the snake is chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Cell,
}

impl Food {
    /// Create food at a specific cell
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    /// Place food on a random cell not in `occupied`
    ///
    /// Returns `None` when every cell of the grid is occupied.
    pub fn spawn<'a, R: Rng + ?Sized>(
        grid: &Grid,
        occupied: impl IntoIterator<Item = &'a Cell>,
        rng: &mut R,
    ) -> Option<Self> {
        let mut food = Self::at(Cell::new(0, 0));
        food.respawn(grid, occupied, rng).then_some(food)
    }

    /// Move the food to a uniformly random free cell
    ///
    /// Rejection-samples the grid. When `occupied` already covers every
    /// in-bounds cell, returns `false` and leaves the position unchanged.
    pub fn respawn<'a, R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: impl IntoIterator<Item = &'a Cell>,
        rng: &mut R,
    ) -> bool {
        let occupied: HashSet<Cell> = occupied
            .into_iter()
            .copied()
            .filter(|&cell| grid.contains(cell))
            .collect();

        if occupied.len() >= grid.cell_count() {
            return false;
        }

        loop {
            let candidate = grid.random_cell(rng);
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return true;
            }
        }
    }

    /// Check if a cell matches the food position
    pub fn is_at(&self, cell: Cell) -> bool {
        self.position == cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_respawn_avoids_occupied() {
        let grid = Grid::new(5, 5);
        let mut rng = StdRng::seed_from_u64(42);
        // Leave only the bottom row free
        let occupied: Vec<Cell> = grid.cells().filter(|c| c.y < 4).collect();
        let mut food = Food::at(Cell::new(0, 0));

        for _ in 0..50 {
            assert!(food.respawn(&grid, &occupied, &mut rng));
            assert!(!occupied.contains(&food.position));
            assert_eq!(food.position.y, 4);
        }
    }

    #[test]
    fn test_respawn_last_free_cell() {
        let grid = Grid::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let occupied: Vec<Cell> = grid.cells().filter(|&c| c != Cell::new(2, 1)).collect();
        let mut food = Food::at(Cell::new(0, 0));

        assert!(food.respawn(&grid, &occupied, &mut rng));
        assert!(food.is_at(Cell::new(2, 1)));
    }

    #[test]
    fn test_respawn_on_full_board() {
        let grid = Grid::new(2, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let occupied: Vec<Cell> = grid.cells().collect();
        let mut food = Food::at(Cell::new(1, 1));

        assert!(!food.respawn(&grid, &occupied, &mut rng));
        assert_eq!(food.position, Cell::new(1, 1));
        assert!(Food::spawn(&grid, &occupied, &mut rng).is_none());
    }

    #[test]
    fn test_out_of_bounds_cells_do_not_count_as_occupied() {
        let grid = Grid::new(1, 2);
        let mut rng = StdRng::seed_from_u64(9);
        let occupied = [Cell::new(0, 0), Cell::new(5, 5), Cell::new(-1, 0)];

        let food = Food::spawn(&grid, &occupied, &mut rng).expect("one cell is free");
        assert_eq!(food.position, Cell::new(0, 1));
    }
}
