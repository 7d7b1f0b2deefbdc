use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use arcade_snake::config::AppConfig;
use arcade_snake::game::format_duration;
use arcade_snake::logging;
use arcade_snake::store::{
    self, BackendKind, GameRecord, LeaderboardEntry, StoreSummary, UserProfile, UserStats,
};

#[derive(Parser)]
#[command(name = "leaderboard")]
#[command(version, about = "Inspect players and high scores")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Score storage backend
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendKind>,

    /// SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Best games across all players
    Top {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Registered players, newest first
    Users,
    /// Per-player statistics
    Stats,
    /// One player's profile and recent games
    User { name: String },
    /// Storage summary
    Info,
}

/// Profile view for a single player
#[derive(Serialize)]
struct PlayerReport {
    profile: UserProfile,
    stats: UserStats,
    recent_games: Vec<GameRecord>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_stderr()?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(db) = cli.db {
        config.storage.path = db;
    }

    let store = store::open(&config.storage)
        .with_context(|| format!("Failed to open score store at {:?}", config.storage.path))?;

    match cli.command {
        Command::Top { limit } => {
            let entries = store.leaderboard(limit)?;
            emit(cli.json, entries.as_slice(), format_leaderboard)
        }
        Command::Users => {
            let users = store.users()?;
            emit(cli.json, users.as_slice(), format_users)
        }
        Command::Stats => {
            let stats = store.all_user_stats()?;
            emit(cli.json, stats.as_slice(), format_stats)
        }
        Command::User { name } => {
            let Some(profile) = store.find_user(&name)? else {
                bail!("No player named {:?}", name);
            };
            let report = PlayerReport {
                stats: store.user_stats(profile.id)?,
                recent_games: store.recent_games(profile.id, 10)?,
                profile,
            };
            emit(cli.json, &report, format_report)
        }
        Command::Info => {
            let summary = store.summary()?;
            emit(cli.json, &summary, format_summary)
        }
    }
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, table: fn(&T) -> String) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("Failed to encode JSON")?;
        println!("{out}");
    } else {
        print!("{}", table(value));
    }
    Ok(())
}

fn rule() -> String {
    "=".repeat(70)
}

fn date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn clock(secs: u64) -> String {
    format_duration(Duration::from_secs(secs))
}

fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No games recorded yet.\n".to_string();
    }

    let mut out = format!("{}\nHIGH SCORES\n{}\n", rule(), rule());
    out.push_str(&format!(
        "{:<5} {:<20} {:>7} {:>7} {:>7}  {}\n",
        "Rank", "Player", "Score", "Length", "Time", "Achieved"
    ));
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<20} {:>7} {:>7} {:>7}  {}\n",
            i + 1,
            entry.username,
            entry.score,
            entry.snake_length,
            clock(entry.duration_secs),
            date(&entry.achieved_at)
        ));
    }
    out
}

fn format_users(users: &[UserProfile]) -> String {
    if users.is_empty() {
        return "No registered players.\n".to_string();
    }

    let mut out = format!("{}\nPLAYERS\n{}\n", rule(), rule());
    out.push_str(&format!(
        "{:<5} {:<20} {:<28} {}\n",
        "ID", "Username", "Email", "Last login"
    ));
    for user in users {
        let last_login = user
            .last_login
            .as_ref()
            .map(date)
            .unwrap_or_else(|| "never".to_string());
        out.push_str(&format!(
            "{:<5} {:<20} {:<28} {}\n",
            user.id, user.username, user.email, last_login
        ));
    }
    out
}

fn format_stats(stats: &[UserStats]) -> String {
    if stats.is_empty() {
        return "No registered players.\n".to_string();
    }

    let mut out = format!("{}\nPLAYER STATISTICS\n{}\n", rule(), rule());
    out.push_str(&format!(
        "{:<20} {:>6} {:>6} {:>7} {:>8} {:>8}\n",
        "Player", "Games", "Best", "Longest", "Avg", "Avg time"
    ));
    for row in stats {
        out.push_str(&format!(
            "{:<20} {:>6} {:>6} {:>7} {:>8.1} {:>7.1}s\n",
            row.username,
            row.games_played,
            row.best_score,
            row.longest_snake,
            row.avg_score,
            row.avg_duration
        ));
    }
    out
}

fn format_report(report: &PlayerReport) -> String {
    let profile = &report.profile;
    let stats = &report.stats;

    let mut out = format!("{}\n{}\n{}\n", rule(), profile.username, rule());
    out.push_str(&format!("Email:        {}\n", profile.email));
    out.push_str(&format!("Joined:       {}\n", date(&profile.created_at)));
    out.push_str(&format!("Games played: {}\n", stats.games_played));
    out.push_str(&format!("Best score:   {}\n", stats.best_score));
    out.push_str(&format!("Avg score:    {:.1}\n", stats.avg_score));

    if report.recent_games.is_empty() {
        out.push_str("\nNo games played yet.\n");
        return out;
    }

    out.push_str("\nRecent games:\n");
    for game in &report.recent_games {
        out.push_str(&format!(
            "  {}  score {:>5}  length {:>4}  time {}\n",
            date(&game.achieved_at),
            game.score,
            game.snake_length,
            clock(game.duration_secs)
        ));
    }
    out
}

fn format_summary(summary: &StoreSummary) -> String {
    let top = summary
        .top_score
        .map(|score| score.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Backend:   {}\nPlayers:   {}\nGames:     {}\nTop score: {}\n",
        summary.backend, summary.users, summary.games, top
    )
}
