use super::action::Direction;
use super::grid::{Cell, Grid};
use super::state::CollisionType;
use std::collections::VecDeque;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Cell>,
    /// Current direction of movement
    direction: Direction,
    /// Moves left during which the tail is kept
    pending_growth: u32,
}

impl Snake {
    /// Create a new snake with given starting cell and direction
    ///
    /// Segments are laid out behind the head, opposite to `direction`.
    /// A `length` of zero is treated as one.
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (back_dx, back_dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(back_dx * i, back_dy * i))
            .collect();

        Self {
            body,
            direction,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns `None` for an empty body.
    pub fn from_body(body: impl IntoIterator<Item = Cell>, direction: Direction) -> Option<Self> {
        let body: VecDeque<Cell> = body.into_iter().collect();
        if body.is_empty() {
            return None;
        }

        Some(Self {
            body,
            direction,
            pending_growth: 0,
        })
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// All segments, head first
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    /// Owned copy of the segments, head first
    pub fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }

    /// Check if any segment (head included) sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Check if `cell` collides with the body (excluding head)
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == cell)
    }

    /// Advance one cell in the current direction
    ///
    /// Keeps the tail while growth is pending, so the snake gains exactly one
    /// segment per pending unit.
    pub fn move_forward(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
    }

    /// Steer the snake, ignoring an instant reversal into the neck
    pub fn change_direction(&mut self, direction: Direction) {
        if self.body.len() > 1 && self.direction.is_opposite(direction) {
            return;
        }
        self.direction = direction;
    }

    /// Queue `amount` segments of growth
    pub fn grow(&mut self, amount: u32) {
        self.pending_growth += amount;
    }

    /// Which collision, if any, the head is currently in
    ///
    /// Walls are checked before the body, so a head that left the board is
    /// always reported as `Wall`.
    pub fn collision(&self, grid: &Grid) -> Option<CollisionType> {
        let head = self.head();
        if !grid.contains(head) {
            return Some(CollisionType::Wall);
        }
        if self.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    pub fn check_collision(&self, grid: &Grid) -> bool {
        self.collision(grid).is_some()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[(i32, i32)]) -> Vec<Cell> {
        raw.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(5, 5));
        assert_eq!(snake.to_vec(), cells(&[(5, 5), (4, 5), (3, 5)]));
        assert_eq!(snake.pending_growth(), 0);
    }

    #[test]
    fn test_zero_length_becomes_head_only() {
        let snake = Snake::new(Cell::new(1, 1), Direction::Up, 0);
        assert_eq!(snake.len(), 1);
        assert!(!snake.is_empty());
        assert!(Snake::from_body(Vec::new(), Direction::Up).is_none());
    }

    #[test]
    fn test_move_keeps_length_without_growth() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        snake.move_forward();
        assert_eq!(snake.to_vec(), cells(&[(6, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_move_with_pending_growth() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        snake.grow(2);

        snake.move_forward();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.pending_growth(), 1);

        snake.move_forward();
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.pending_growth(), 0);

        snake.move_forward();
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.to_vec(), cells(&[(8, 5), (7, 5), (6, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        snake.change_direction(Direction::Left);
        assert_eq!(snake.direction(), Direction::Right);

        snake.change_direction(Direction::Up);
        assert_eq!(snake.direction(), Direction::Up);
        snake.change_direction(Direction::Down);
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_single_cell_snake_may_reverse() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 1);
        snake.change_direction(Direction::Left);
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn test_same_direction_is_idempotent() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Down, 3);
        let before = snake.clone();
        for _ in 0..5 {
            snake.change_direction(Direction::Down);
        }
        assert_eq!(snake, before);
    }

    #[test]
    fn test_collides_with_body() {
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(Cell::new(5, 5))); // head
        assert!(snake.collides_with_body(Cell::new(4, 5))); // body
        assert!(!snake.collides_with_body(Cell::new(10, 10))); // empty
        assert!(snake.occupies(Cell::new(5, 5)));
    }

    #[test]
    fn test_wall_collision_after_move() {
        let grid = Grid::new(10, 10);
        let mut snake = Snake::from_body(cells(&[(9, 5), (8, 5), (7, 5)]), Direction::Right)
            .expect("non-empty body");
        assert!(!snake.check_collision(&grid));

        snake.move_forward();
        assert_eq!(snake.head(), Cell::new(10, 5));
        assert_eq!(snake.collision(&grid), Some(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision_after_move() {
        let grid = Grid::new(10, 10);
        // Curled so that moving Up lands on (5,5), still part of the body
        let mut snake = Snake::from_body(
            cells(&[(5, 6), (6, 6), (6, 5), (5, 5), (4, 5)]),
            Direction::Left,
        )
        .expect("non-empty body");
        snake.change_direction(Direction::Up);
        snake.move_forward();

        assert_eq!(snake.head(), Cell::new(5, 5));
        assert_eq!(snake.collision(&grid), Some(CollisionType::SelfCollision));
        assert!(snake.check_collision(&grid));
    }

    #[test]
    fn test_chasing_own_tail_is_safe() {
        let grid = Grid::new(10, 10);
        // A 2x2 loop: the tail leaves the cell the head moves into
        let mut snake = Snake::from_body(
            cells(&[(5, 6), (6, 6), (6, 5), (5, 5)]),
            Direction::Left,
        )
        .expect("non-empty body");
        snake.change_direction(Direction::Up);
        snake.move_forward();

        assert_eq!(snake.head(), Cell::new(5, 5));
        assert!(!snake.check_collision(&grid));
    }
}
