use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use arcade_snake::config::AppConfig;
use arcade_snake::game::GameEngine;
use arcade_snake::logging;
use arcade_snake::modes::{LoginGate, PlayMode, terminal};
use arcade_snake::sound;
use arcade_snake::store::{self, BackendKind, ScoreStore};

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Terminal Snake with player accounts and a leaderboard")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between snake moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Score storage backend
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Disable sound cues
    #[arg(long)]
    no_sound: bool,

    /// Skip login; scores are not saved
    #[arg(long)]
    guest: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<(AppConfig, bool, Option<u64>)> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.game.tick_interval_ms = tick_ms;
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(db) = self.db {
            config.storage.path = db;
        }
        if self.no_sound {
            config.sound = false;
        }

        Ok((config, self.guest, self.seed))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, guest, seed) = Cli::parse().into_config()?;
    config.game.validate().context("Invalid game configuration")?;

    logging::init_file(&config.log_file)?;
    info!(?config, guest, "starting");

    let store = store::open(&config.storage)
        .with_context(|| format!("Failed to open score store at {:?}", config.storage.path))?;

    let engine = match seed {
        Some(seed) => GameEngine::with_seed(config.game.clone(), seed),
        None => GameEngine::new(config.game.clone()),
    };

    let mut terminal = terminal::enter()?;

    // Run with cleanup
    let result = play(&mut terminal, engine, store, config.sound, guest).await;

    terminal::leave(&mut terminal)?;

    result
}

async fn play(
    terminal: &mut terminal::Tui,
    engine: GameEngine,
    mut store: Box<dyn ScoreStore>,
    sound_enabled: bool,
    guest: bool,
) -> Result<()> {
    let session = if guest {
        None
    } else {
        match LoginGate::new().run(terminal, store.as_mut()).await? {
            Some(session) => Some(session),
            None => return Ok(()),
        }
    };

    let mut mode = PlayMode::with_engine(engine, store, sound::sink(sound_enabled), session);
    mode.run(terminal).await
}
