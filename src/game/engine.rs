use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{debug, info};

use super::{
    action::{Direction, Intent},
    config::GameConfig,
    food::Food,
    grid::Grid,
    snake::Snake,
    state::{EndReason, GameEvent, GameState, Phase},
};

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Side effect produced this step, if any
    pub event: Option<GameEvent>,
    /// Whether the game is over after this step
    pub terminated: bool,
}

impl StepResult {
    fn idle(state: &GameState) -> Self {
        Self {
            event: None,
            terminated: state.is_over(),
        }
    }
}

/// What the driver should do after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The game engine that handles all game logic
///
/// The engine is cadence-agnostic: it advances exactly one cell per
/// [`GameEngine::tick`] and never looks at the wall clock itself.
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            grid: config.grid(),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Start a fresh game with no recorded high score
    pub fn new_game(&mut self, now: Instant) -> GameState {
        let snake = Snake::new(
            self.grid.center(),
            Direction::Right,
            self.config.initial_snake_length,
        );

        match Food::spawn(&self.grid, snake.body(), &mut self.rng) {
            Some(food) => {
                info!(
                    width = self.grid.width,
                    height = self.grid.height,
                    "new game started"
                );
                GameState::new(snake, food.position, now)
            }
            None => {
                let head = snake.head();
                let mut state = GameState::new(snake, head, now);
                self.end_game(&mut state, EndReason::BoardFull, now);
                state
            }
        }
    }

    /// Reinitialize snake, food, score and clock, keeping the high score
    pub fn reset(&mut self, state: &mut GameState, now: Instant) {
        let high_score = state.high_score;
        *state = self.new_game(now);
        state.high_score = state.high_score.max(high_score);
    }

    /// Advance the simulation by one cell
    ///
    /// Does nothing unless the game is playing. Collisions are checked on
    /// the moved body before food, so a fatal move never scores.
    pub fn tick(&mut self, state: &mut GameState, now: Instant) -> StepResult {
        if state.phase != Phase::Playing {
            return StepResult::idle(state);
        }

        state.snake.move_forward();

        if let Some(collision) = state.snake.collision(&self.grid) {
            let event = self.end_game(state, EndReason::Collision(collision), now);
            return StepResult {
                event: Some(event),
                terminated: true,
            };
        }

        if !state.food.is_at(state.snake.head()) {
            return StepResult::idle(state);
        }

        state.score += self.config.food_score;
        state.snake.grow(1);
        debug!(score = state.score, length = state.snake.len(), "food eaten");

        if !state
            .food
            .respawn(&self.grid, state.snake.body(), &mut self.rng)
        {
            let event = self.end_game(state, EndReason::BoardFull, now);
            return StepResult {
                event: Some(event),
                terminated: true,
            };
        }

        StepResult {
            event: Some(GameEvent::Ate),
            terminated: false,
        }
    }

    /// Apply a player intent immediately
    ///
    /// Intents that make no sense in the current phase are ignored.
    pub fn apply(&mut self, state: &mut GameState, intent: Intent, now: Instant) -> Flow {
        match intent {
            Intent::Quit => return Flow::Quit,
            Intent::Turn(direction) => {
                if state.phase != Phase::GameOver {
                    state.snake.change_direction(direction);
                }
            }
            Intent::TogglePause => match state.phase {
                Phase::Playing => {
                    state.phase = Phase::Paused;
                    state.clock.stop(now);
                    debug!("game paused");
                }
                Phase::Paused => {
                    state.phase = Phase::Playing;
                    state.clock.resume(now);
                    debug!("game resumed");
                }
                Phase::GameOver => {}
            },
            Intent::Restart => {
                if state.phase == Phase::GameOver {
                    self.reset(state, now);
                }
            }
        }

        Flow::Continue
    }

    fn end_game(&self, state: &mut GameState, reason: EndReason, now: Instant) -> GameEvent {
        state.phase = Phase::GameOver;
        state.end_reason = Some(reason);
        state.clock.stop(now);
        state.high_score = state.high_score.max(state.score);

        let final_score = state.final_score(now);
        info!(
            ?reason,
            score = final_score.score,
            length = final_score.snake_length,
            duration_secs = final_score.duration_secs,
            "game over"
        );
        GameEvent::GameOver(final_score)
    }
}
