//! Score persistence
//!
//! Accounts and finished games live behind [`ScoreStore`]. Two backends are
//! available and one is picked from configuration at startup:
//!
//! - [`SqliteStore`] - a SQLite file, shared with the `leaderboard` viewer
//! - [`MemoryStore`] - process-local, gone on exit

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::game::FinalScore;

pub type UserId = i64;

/// Errors from the score store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Invalid timestamp in store: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Username or email already exists")]
    UserExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(UserId),
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// One finished game of one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub score: u32,
    pub snake_length: u32,
    pub duration_secs: u64,
    pub achieved_at: DateTime<Utc>,
}

/// A row of the global leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub snake_length: u32,
    pub duration_secs: u64,
    pub achieved_at: DateTime<Utc>,
}

/// Aggregate statistics for a player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub username: String,
    pub games_played: u32,
    pub best_score: u32,
    pub longest_snake: u32,
    /// Rounded to one decimal
    pub avg_score: f64,
    /// Seconds, rounded to one decimal
    pub avg_duration: f64,
}

/// Store-wide counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub backend: &'static str,
    pub users: u32,
    pub games: u32,
    pub top_score: Option<u32>,
}

/// Account and score storage shared by the game and the viewer
pub trait ScoreStore {
    /// Short backend name for logs and the viewer
    fn backend_name(&self) -> &'static str;

    /// Register an account; fails with [`StoreError::UserExists`] when the
    /// username or email is taken
    fn create_user(&mut self, username: &str, email: &str, password: &str) -> Result<UserId, StoreError>;

    /// Check credentials and stamp the last login time
    fn authenticate(&mut self, username: &str, password: &str) -> Result<UserId, StoreError>;

    fn save_score(&mut self, user_id: UserId, result: &FinalScore) -> Result<(), StoreError>;

    /// Best score of a player, 0 when they have no games
    fn user_high_score(&self, user_id: UserId) -> Result<u32, StoreError>;

    /// Top scores, highest first, earlier games winning ties
    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    fn user_stats(&self, user_id: UserId) -> Result<UserStats, StoreError>;

    /// Statistics for every player with at least one game, best first
    fn all_user_stats(&self) -> Result<Vec<UserStats>, StoreError>;

    fn find_user(&self, username: &str) -> Result<Option<UserProfile>, StoreError>;

    /// All accounts, newest first
    fn users(&self) -> Result<Vec<UserProfile>, StoreError>;

    /// A player's latest games, newest first
    fn recent_games(&self, user_id: UserId, limit: usize) -> Result<Vec<GameRecord>, StoreError>;

    fn summary(&self) -> Result<StoreSummary, StoreError>;
}

/// Which storage backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Memory,
}

/// Storage section of the application config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Database file for the SQLite backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            path: PathBuf::from("snake_game.db"),
        }
    }
}

/// Open the configured backend
pub fn open(config: &StorageConfig) -> Result<Box<dyn ScoreStore>, StoreError> {
    let store: Box<dyn ScoreStore> = match config.backend {
        BackendKind::Sqlite => Box::new(SqliteStore::open(&config.path)?),
        BackendKind::Memory => Box::new(MemoryStore::new()),
    };
    tracing::info!(backend = store.backend_name(), "score store ready");
    Ok(store)
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
