use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::action::Direction;
use super::clock::PlayClock;
use super::food::Food;
use super::grid::Cell;
use super::snake::Snake;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake filled every cell, leaving nowhere for food
    BoardFull,
}

/// State-machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// Value bundle handed to persistence when a game ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u32,
    pub snake_length: u32,
    pub duration_secs: u64,
}

/// Side effects the driver forwards to adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Food was eaten this tick
    Ate,
    /// The game just ended
    GameOver(FinalScore),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    /// Best score seen this process lifetime
    pub high_score: u32,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
    pub clock: PlayClock,
}

impl GameState {
    /// Create a new game state, playing from `now`
    pub fn new(snake: Snake, food: Cell, now: Instant) -> Self {
        Self {
            snake,
            food: Food::at(food),
            score: 0,
            high_score: 0,
            phase: Phase::Playing,
            end_reason: None,
            clock: PlayClock::started(now),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.clock.elapsed(now)
    }

    /// The bundle recorded when this game ends
    pub fn final_score(&self, now: Instant) -> FinalScore {
        FinalScore {
            score: self.score,
            snake_length: self.snake.len() as u32,
            duration_secs: self.elapsed(now).as_secs(),
        }
    }

    /// Owned copy for renderers
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        Snapshot {
            body: self.snake.to_vec(),
            direction: self.snake.direction(),
            food: self.food.position,
            score: self.score,
            high_score: self.high_score,
            elapsed: self.elapsed(now),
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }
}

/// Read-only view of a game at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Segments, head first
    pub body: Vec<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub elapsed: Duration,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

impl Snapshot {
    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }

    pub fn snake_length(&self) -> usize {
        self.body.len()
    }

    /// True when the current score beats every earlier game this session
    pub fn is_new_record(&self) -> bool {
        self.score > 0 && self.score >= self.high_score
    }
}
