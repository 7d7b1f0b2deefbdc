//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time enters only as `Instant` arguments, so everything here is deterministic
//! under a seeded engine.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use clock::{PlayClock, format_duration};
pub use config::{ConfigError, GameConfig};
pub use engine::{Flow, GameEngine, StepResult};
pub use food::Food;
pub use grid::{Cell, Grid};
pub use snake::Snake;
pub use state::{CollisionType, EndReason, FinalScore, GameEvent, GameState, Phase, Snapshot};
