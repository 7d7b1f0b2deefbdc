use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::grid::Grid;

/// Largest accepted grid side, in cells
pub const MAX_GRID_SIDE: usize = 1000;

/// Reasons a game configuration cannot be played
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("grid may be at most {max}x{max}, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("a snake of length {length} does not fit a {width}x{height} grid")]
    SnakeTooLong {
        length: usize,
        width: usize,
        height: usize,
    },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food eaten
    pub food_score: u32,
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 3,
            food_score: 10,
            tick_interval_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the board can hold the starting snake plus one food cell
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIDE,
            });
        }

        // The snake starts at the center and extends left
        let length = self.initial_snake_length.max(1);
        let fits_row = self.grid_width / 2 + 1 >= length;
        if !fits_row || self.grid().cell_count() <= length {
            return Err(ConfigError::SnakeTooLong {
                length,
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(())
    }
}
