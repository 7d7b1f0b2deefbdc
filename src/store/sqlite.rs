//! SQLite storage for accounts and scores

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use super::{
    GameRecord, LeaderboardEntry, ScoreStore, StoreError, StoreSummary, UserId, UserProfile,
    UserStats, round1,
};
use crate::auth::password::{hash_password, verify_password};
use crate::game::FinalScore;

/// SQLite-backed score store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS users (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 username TEXT UNIQUE NOT NULL,
                 email TEXT UNIQUE NOT NULL,
                 password_hash TEXT NOT NULL,
                 created_at TEXT NOT NULL,
                 last_login TEXT NULL
             );

             CREATE TABLE IF NOT EXISTS high_scores (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 user_id INTEGER NOT NULL,
                 score INTEGER NOT NULL,
                 snake_length INTEGER NOT NULL,
                 game_duration INTEGER NOT NULL,
                 achieved_at TEXT NOT NULL,
                 FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
             );

             CREATE INDEX IF NOT EXISTS idx_user_score ON high_scores(user_id, score);
             CREATE INDEX IF NOT EXISTS idx_score ON high_scores(score DESC);",
        )?;
        Ok(())
    }

    fn ensure_user(&self, user_id: UserId) -> Result<(), StoreError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
            params![user_id],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(StoreError::UserNotFound(user_id))
        }
    }

    fn profiles(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<UserProfile>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, username, email, created_at, last_login)| {
                Ok(UserProfile {
                    id,
                    username,
                    email,
                    created_at: parse_time(&created_at)?,
                    last_login: last_login.as_deref().map(parse_time).transpose()?,
                })
            })
            .collect()
    }
}

impl ScoreStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn create_user(&mut self, username: &str, email: &str, password: &str) -> Result<UserId, StoreError> {
        let taken: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 OR email = ?2)",
            params![username, email],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StoreError::UserExists);
        }

        let password_hash = hash_password(password)?;
        self.conn.execute(
            "INSERT INTO users (username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, email, password_hash, format_time(Utc::now())],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(username, id, "user created");
        Ok(id)
    }

    fn authenticate(&mut self, username: &str, password: &str) -> Result<UserId, StoreError> {
        let found: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((id, stored_hash)) = found else {
            return Err(StoreError::InvalidCredentials);
        };
        if !verify_password(password, &stored_hash) {
            return Err(StoreError::InvalidCredentials);
        }

        self.conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![format_time(Utc::now()), id],
        )?;
        tracing::info!(username, "user authenticated");
        Ok(id)
    }

    fn save_score(&mut self, user_id: UserId, result: &FinalScore) -> Result<(), StoreError> {
        self.ensure_user(user_id)?;
        self.conn.execute(
            "INSERT INTO high_scores (user_id, score, snake_length, game_duration, achieved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                result.score,
                result.snake_length,
                result.duration_secs as i64,
                format_time(Utc::now()),
            ],
        )?;
        tracing::info!(user_id, score = result.score, "score saved");
        Ok(())
    }

    fn user_high_score(&self, user_id: UserId) -> Result<u32, StoreError> {
        let best: Option<u32> = self.conn.query_row(
            "SELECT MAX(score) FROM high_scores WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(best.unwrap_or(0))
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT u.username, h.score, h.snake_length, h.game_duration, h.achieved_at
             FROM high_scores h
             JOIN users u ON h.user_id = u.id
             ORDER BY h.score DESC, h.achieved_at ASC, h.id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(username, score, snake_length, duration, achieved_at)| {
                Ok(LeaderboardEntry {
                    username,
                    score,
                    snake_length,
                    duration_secs: duration.max(0) as u64,
                    achieved_at: parse_time(&achieved_at)?,
                })
            })
            .collect()
    }

    fn user_stats(&self, user_id: UserId) -> Result<UserStats, StoreError> {
        let username: Option<String> = self
            .conn
            .query_row(
                "SELECT username FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        let username = username.ok_or(StoreError::UserNotFound(user_id))?;

        let (games_played, best_score, longest_snake, avg_score, avg_duration) = self.conn.query_row(
            "SELECT COUNT(*), MAX(score), MAX(snake_length), AVG(score), AVG(game_duration)
             FROM high_scores WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, Option<u32>>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                ))
            },
        )?;

        Ok(UserStats {
            username,
            games_played,
            best_score: best_score.unwrap_or(0),
            longest_snake: longest_snake.unwrap_or(0),
            avg_score: round1(avg_score.unwrap_or(0.0)),
            avg_duration: round1(avg_duration.unwrap_or(0.0)),
        })
    }

    fn all_user_stats(&self) -> Result<Vec<UserStats>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT u.username, COUNT(h.id), MAX(h.score), MAX(h.snake_length),
                    AVG(h.score), AVG(h.game_duration)
             FROM users u
             JOIN high_scores h ON h.user_id = u.id
             GROUP BY u.id
             ORDER BY MAX(h.score) DESC",
        )?;
        let stats = stmt
            .query_map([], |row| {
                Ok(UserStats {
                    username: row.get(0)?,
                    games_played: row.get(1)?,
                    best_score: row.get(2)?,
                    longest_snake: row.get(3)?,
                    avg_score: round1(row.get(4)?),
                    avg_duration: round1(row.get(5)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    fn find_user(&self, username: &str) -> Result<Option<UserProfile>, StoreError> {
        let mut found = self.profiles(
            "SELECT id, username, email, created_at, last_login FROM users WHERE username = ?1",
            params![username],
        )?;
        Ok(found.pop())
    }

    fn users(&self) -> Result<Vec<UserProfile>, StoreError> {
        self.profiles(
            "SELECT id, username, email, created_at, last_login FROM users
             ORDER BY created_at DESC, id DESC",
            [],
        )
    }

    fn recent_games(&self, user_id: UserId, limit: usize) -> Result<Vec<GameRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT score, snake_length, game_duration, achieved_at
             FROM high_scores WHERE user_id = ?1
             ORDER BY achieved_at DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(score, snake_length, duration, achieved_at)| {
                Ok(GameRecord {
                    score,
                    snake_length,
                    duration_secs: duration.max(0) as u64,
                    achieved_at: parse_time(&achieved_at)?,
                })
            })
            .collect()
    }

    fn summary(&self) -> Result<StoreSummary, StoreError> {
        let (users, games, top_score): (u32, u32, Option<u32>) = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM high_scores),
                    (SELECT MAX(score) FROM high_scores)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(StoreSummary {
            backend: self.backend_name(),
            users,
            games,
            top_score,
        })
    }
}

/// Fixed-width UTC timestamps so text order matches time order
fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
