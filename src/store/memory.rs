//! Process-local score store

use chrono::{DateTime, Utc};

use super::{
    GameRecord, LeaderboardEntry, ScoreStore, StoreError, StoreSummary, UserId, UserProfile,
    UserStats, round1,
};
use crate::auth::password::{hash_password, verify_password};
use crate::game::FinalScore;

struct UserRow {
    profile: UserProfile,
    password_hash: String,
}

struct ScoreRow {
    id: i64,
    user_id: UserId,
    record: GameRecord,
}

/// Keeps accounts and scores in memory for the life of the process
#[derive(Default)]
pub struct MemoryStore {
    users: Vec<UserRow>,
    scores: Vec<ScoreRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user(&self, user_id: UserId) -> Result<&UserRow, StoreError> {
        self.users
            .iter()
            .find(|row| row.profile.id == user_id)
            .ok_or(StoreError::UserNotFound(user_id))
    }

    fn games_of(&self, user_id: UserId) -> impl Iterator<Item = &ScoreRow> + '_ {
        self.scores.iter().filter(move |row| row.user_id == user_id)
    }
}

impl ScoreStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create_user(&mut self, username: &str, email: &str, password: &str) -> Result<UserId, StoreError> {
        if self
            .users
            .iter()
            .any(|row| row.profile.username == username || row.profile.email == email)
        {
            return Err(StoreError::UserExists);
        }

        let id = self.users.len() as UserId + 1;
        self.users.push(UserRow {
            profile: UserProfile {
                id,
                username: username.to_string(),
                email: email.to_string(),
                created_at: Utc::now(),
                last_login: None,
            },
            password_hash: hash_password(password)?,
        });
        Ok(id)
    }

    fn authenticate(&mut self, username: &str, password: &str) -> Result<UserId, StoreError> {
        let row = self
            .users
            .iter_mut()
            .find(|row| row.profile.username == username)
            .ok_or(StoreError::InvalidCredentials)?;

        if !verify_password(password, &row.password_hash) {
            return Err(StoreError::InvalidCredentials);
        }

        row.profile.last_login = Some(Utc::now());
        Ok(row.profile.id)
    }

    fn save_score(&mut self, user_id: UserId, result: &FinalScore) -> Result<(), StoreError> {
        self.user(user_id)?;

        let id = self.scores.len() as i64 + 1;
        self.scores.push(ScoreRow {
            id,
            user_id,
            record: GameRecord {
                score: result.score,
                snake_length: result.snake_length,
                duration_secs: result.duration_secs,
                achieved_at: Utc::now(),
            },
        });
        Ok(())
    }

    fn user_high_score(&self, user_id: UserId) -> Result<u32, StoreError> {
        Ok(self
            .games_of(user_id)
            .map(|row| row.record.score)
            .max()
            .unwrap_or(0))
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut rows: Vec<&ScoreRow> = self.scores.iter().collect();
        rows.sort_by(|a, b| {
            b.record
                .score
                .cmp(&a.record.score)
                .then(a.record.achieved_at.cmp(&b.record.achieved_at))
                .then(a.id.cmp(&b.id))
        });

        rows.into_iter()
            .take(limit)
            .map(|row| {
                Ok(LeaderboardEntry {
                    username: self.user(row.user_id)?.profile.username.clone(),
                    score: row.record.score,
                    snake_length: row.record.snake_length,
                    duration_secs: row.record.duration_secs,
                    achieved_at: row.record.achieved_at,
                })
            })
            .collect()
    }

    fn user_stats(&self, user_id: UserId) -> Result<UserStats, StoreError> {
        let user = self.user(user_id)?;
        let games: Vec<&GameRecord> = self.games_of(user_id).map(|row| &row.record).collect();

        let count = games.len() as f64;
        let mean = |total: f64| if games.is_empty() { 0.0 } else { round1(total / count) };

        Ok(UserStats {
            username: user.profile.username.clone(),
            games_played: games.len() as u32,
            best_score: games.iter().map(|g| g.score).max().unwrap_or(0),
            longest_snake: games.iter().map(|g| g.snake_length).max().unwrap_or(0),
            avg_score: mean(games.iter().map(|g| g.score as f64).sum()),
            avg_duration: mean(games.iter().map(|g| g.duration_secs as f64).sum()),
        })
    }

    fn all_user_stats(&self) -> Result<Vec<UserStats>, StoreError> {
        let mut stats = Vec::new();
        for row in &self.users {
            let user_stats = self.user_stats(row.profile.id)?;
            if user_stats.games_played > 0 {
                stats.push(user_stats);
            }
        }
        stats.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        Ok(stats)
    }

    fn find_user(&self, username: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|row| row.profile.username == username)
            .map(|row| row.profile.clone()))
    }

    fn users(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut users: Vec<UserProfile> = self.users.iter().map(|row| row.profile.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    fn recent_games(&self, user_id: UserId, limit: usize) -> Result<Vec<GameRecord>, StoreError> {
        let mut rows: Vec<&ScoreRow> = self.games_of(user_id).collect();
        rows.sort_by(|a, b| {
            let newest = |row: &ScoreRow| -> (DateTime<Utc>, i64) { (row.record.achieved_at, row.id) };
            newest(b).cmp(&newest(a))
        });
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|row| row.record.clone())
            .collect())
    }

    fn summary(&self) -> Result<StoreSummary, StoreError> {
        Ok(StoreSummary {
            backend: self.backend_name(),
            users: self.users.len() as u32,
            games: self.scores.len() as u32,
            top_score: self.scores.iter().map(|row| row.record.score).max(),
        })
    }
}
