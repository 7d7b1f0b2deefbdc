use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use super::terminal::Tui;
use crate::auth::Session;
use crate::game::{FinalScore, Flow, GameEngine, GameEvent, GameState, Phase};
use crate::input::InputHandler;
use crate::render::{Hud, Renderer};
use crate::sound::{SoundCue, SoundSink};
use crate::store::ScoreStore;

pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    renderer: Renderer,
    input_handler: InputHandler,
    store: Box<dyn ScoreStore>,
    sound: Box<dyn SoundSink>,
    session: Option<Session>,
    /// Stored best of the logged-in player; `None` for guests or when unknown
    personal_best: Option<u32>,
    notice: Option<String>,
    should_quit: bool,
}

impl PlayMode {
    /// Play with a pre-built engine, e.g. one with a fixed seed
    pub fn with_engine(
        mut engine: GameEngine,
        store: Box<dyn ScoreStore>,
        sound: Box<dyn SoundSink>,
        session: Option<Session>,
    ) -> Self {
        let mut state = engine.new_game(Instant::now());
        let personal_best = session.as_ref().and_then(|session| {
            match store.user_high_score(session.user_id) {
                Ok(best) => Some(best),
                Err(err) => {
                    warn!(error = %err, user = %session.username, "could not load personal best");
                    None
                }
            }
        });
        state.high_score = personal_best.unwrap_or(0);

        Self {
            engine,
            state,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            store,
            sound,
            session,
            personal_best,
            notice: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(high_score = self.state.high_score, "leaving game");
        Ok(())
    }

    fn draw(&self, terminal: &mut Tui) -> Result<()> {
        let snapshot = self.state.snapshot(Instant::now());
        let hud = Hud {
            player: self.session.as_ref().map(|s| s.username.as_str()),
            notice: self.notice.as_deref(),
        };
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, &snapshot, self.engine.grid(), &hud);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let Some(intent) = self.input_handler.handle_key_event(key, self.state.phase) else {
            return;
        };

        let was_over = self.state.is_over();
        if self.engine.apply(&mut self.state, intent, Instant::now()) == Flow::Quit {
            self.should_quit = true;
        }
        if was_over && self.state.phase != Phase::GameOver {
            self.notice = None;
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.tick(&mut self.state, Instant::now());
        if let Some(event) = result.event {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: GameEvent) {
        self.sound.play(SoundCue::from(&event));
        if let GameEvent::GameOver(result) = event {
            self.record(&result);
        }
    }

    /// Persist a finished game for the logged-in player
    fn record(&mut self, result: &FinalScore) {
        let Some(session) = &self.session else {
            self.notice = Some("Guest game - score not saved".to_string());
            return;
        };

        match self.store.save_score(session.user_id, result) {
            Ok(()) => {
                let notice = match self.personal_best {
                    Some(best) if result.score > best => {
                        self.personal_best = Some(result.score);
                        "Score saved - new personal best!"
                    }
                    _ => "Score saved",
                };
                self.notice = Some(notice.to_string());
            }
            Err(err) => {
                warn!(error = %err, user = %session.username, "failed to save score");
                self.notice = Some("Could not save score".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameConfig, Snake};
    use crate::sound::Silent;
    use crate::store::{
        GameRecord, LeaderboardEntry, MemoryStore, StoreError, StoreSummary, UserId, UserProfile,
        UserStats,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SoundCue>>>);

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn logged_in() -> (Box<dyn ScoreStore>, Session) {
        let mut store = MemoryStore::new();
        let user_id = store
            .create_user("boa", "boa@snake.io", "squeeze")
            .expect("create");
        let session = Session {
            user_id,
            username: "boa".to_string(),
        };
        (Box::new(store), session)
    }

    fn mode(store: Box<dyn ScoreStore>, sound: Box<dyn SoundSink>, session: Option<Session>) -> PlayMode {
        PlayMode::with_engine(GameEngine::with_seed(GameConfig::small(), 7), store, sound, session)
    }

    /// Point the snake at the right wall so the next tick ends the game
    fn doom(mode: &mut PlayMode, score: u32) {
        mode.state.snake = Snake::new(Cell::new(9, 5), Direction::Right, 3);
        mode.state.score = score;
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(Box::new(MemoryStore::new()), Box::new(Silent), None);
        assert!(mode.state.is_playing());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.snake.len(), 3);
        assert!(mode.notice.is_none());
    }

    #[test]
    fn test_personal_best_is_loaded() {
        let (mut store, session) = logged_in();
        store
            .save_score(
                session.user_id,
                &FinalScore {
                    score: 70,
                    snake_length: 10,
                    duration_secs: 40,
                },
            )
            .expect("save");
        let mode = mode(store, Box::new(Silent), Some(session));
        assert_eq!(mode.state.high_score, 70);
    }

    #[test]
    fn test_game_over_saves_score() {
        let (store, session) = logged_in();
        let user_id = session.user_id;
        let mut mode = mode(store, Box::new(Silent), Some(session));

        doom(&mut mode, 30);
        mode.update_game();

        assert!(mode.state.is_over());
        assert_eq!(mode.store.user_high_score(user_id).expect("best"), 30);
        assert_eq!(mode.notice.as_deref(), Some("Score saved - new personal best!"));

        let board = mode.store.leaderboard(10).expect("leaderboard");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "boa");
    }

    #[test]
    fn test_lower_score_is_saved_without_record_notice() {
        let (store, session) = logged_in();
        let mut mode = mode(store, Box::new(Silent), Some(session));

        doom(&mut mode, 30);
        mode.update_game();
        mode.handle_event(key(KeyCode::Char(' ')));
        assert!(mode.state.is_playing());
        assert!(mode.notice.is_none());

        doom(&mut mode, 10);
        mode.update_game();
        assert_eq!(mode.notice.as_deref(), Some("Score saved"));
        assert_eq!(mode.state.high_score, 30);
    }

    /// Memory store whose best-score lookup always fails
    struct NoBestStore(MemoryStore);

    impl ScoreStore for NoBestStore {
        fn backend_name(&self) -> &'static str {
            self.0.backend_name()
        }
        fn create_user(&mut self, username: &str, email: &str, password: &str) -> Result<UserId, StoreError> {
            self.0.create_user(username, email, password)
        }
        fn authenticate(&mut self, username: &str, password: &str) -> Result<UserId, StoreError> {
            self.0.authenticate(username, password)
        }
        fn save_score(&mut self, user_id: UserId, result: &FinalScore) -> Result<(), StoreError> {
            self.0.save_score(user_id, result)
        }
        fn user_high_score(&self, user_id: UserId) -> Result<u32, StoreError> {
            Err(StoreError::UserNotFound(user_id))
        }
        fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
            self.0.leaderboard(limit)
        }
        fn user_stats(&self, user_id: UserId) -> Result<UserStats, StoreError> {
            self.0.user_stats(user_id)
        }
        fn all_user_stats(&self) -> Result<Vec<UserStats>, StoreError> {
            self.0.all_user_stats()
        }
        fn find_user(&self, username: &str) -> Result<Option<UserProfile>, StoreError> {
            self.0.find_user(username)
        }
        fn users(&self) -> Result<Vec<UserProfile>, StoreError> {
            self.0.users()
        }
        fn recent_games(&self, user_id: UserId, limit: usize) -> Result<Vec<GameRecord>, StoreError> {
            self.0.recent_games(user_id, limit)
        }
        fn summary(&self) -> Result<StoreSummary, StoreError> {
            self.0.summary()
        }
    }

    #[test]
    fn test_unknown_best_never_claims_record() {
        let mut inner = MemoryStore::new();
        let user_id = inner
            .create_user("asp", "asp@snake.io", "hissing")
            .expect("create");
        inner
            .save_score(user_id, &FinalScore { score: 90, snake_length: 12, duration_secs: 60 })
            .expect("save");
        let session = Session {
            user_id,
            username: "asp".to_string(),
        };
        let mut mode = mode(Box::new(NoBestStore(inner)), Box::new(Silent), Some(session));
        assert_eq!(mode.personal_best, None);
        assert_eq!(mode.state.high_score, 0);

        doom(&mut mode, 20);
        mode.update_game();
        assert_eq!(mode.notice.as_deref(), Some("Score saved"));
        assert_eq!(mode.store.leaderboard(10).expect("leaderboard").len(), 2);
    }

    #[test]
    fn test_record_notice_only_once_per_best() {
        let (store, session) = logged_in();
        let mut mode = mode(store, Box::new(Silent), Some(session));
        assert_eq!(mode.personal_best, Some(0));

        doom(&mut mode, 40);
        mode.update_game();
        assert_eq!(mode.notice.as_deref(), Some("Score saved - new personal best!"));
        assert_eq!(mode.personal_best, Some(40));

        mode.handle_event(key(KeyCode::Enter));
        doom(&mut mode, 40);
        mode.update_game();
        assert_eq!(mode.notice.as_deref(), Some("Score saved"));
    }

    #[test]
    fn test_guest_game_is_not_saved() {
        let mut mode = mode(Box::new(MemoryStore::new()), Box::new(Silent), None);
        doom(&mut mode, 20);
        mode.update_game();

        assert!(mode.state.is_over());
        assert_eq!(mode.notice.as_deref(), Some("Guest game - score not saved"));
        assert!(mode.store.leaderboard(10).expect("leaderboard").is_empty());
    }

    #[test]
    fn test_game_over_plays_cue() {
        let recorder = Recorder::default();
        let mut mode = mode(Box::new(MemoryStore::new()), Box::new(recorder.clone()), None);
        doom(&mut mode, 0);
        mode.update_game();
        assert_eq!(*recorder.0.borrow(), vec![SoundCue::GameOver]);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let mut mode = mode(Box::new(MemoryStore::new()), Box::new(Silent), None);
        let head = mode.state.snake.head();

        mode.handle_event(key(KeyCode::Char('p')));
        assert_eq!(mode.state.phase, Phase::Paused);
        mode.update_game();
        assert_eq!(mode.state.snake.head(), head);

        mode.handle_event(key(KeyCode::Char('p')));
        mode.update_game();
        assert_ne!(mode.state.snake.head(), head);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode(Box::new(MemoryStore::new()), Box::new(Silent), None);
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
