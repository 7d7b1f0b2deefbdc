use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;

use super::terminal::Tui;
use crate::auth::{AuthOutcome, AuthScreen, Session};
use crate::input::InputHandler;
use crate::render::render_auth;
use crate::store::ScoreStore;

/// Login/signup gate shown before the first game
pub struct LoginGate {
    screen: AuthScreen,
    input_handler: InputHandler,
}

impl LoginGate {
    pub fn new() -> Self {
        Self {
            screen: AuthScreen::new(),
            input_handler: InputHandler::new(),
        }
    }

    /// Run until the player logs in or gives up
    ///
    /// Returns `None` when the player quits from the form.
    pub async fn run(&mut self, terminal: &mut Tui, store: &mut dyn ScoreStore) -> Result<Option<Session>> {
        let mut event_stream = EventStream::new();

        loop {
            terminal
                .draw(|frame| render_auth(frame, &self.screen))
                .context("Failed to draw login form")?;

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if let Some(outcome) = self.handle_event(event, store) {
                                return Ok(outcome);
                            }
                        }
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => return Ok(None),
                    }
                }

                _ = tokio::signal::ctrl_c() => return Ok(None),
            }
        }
    }

    /// Returns the finished outcome, or `None` while the form is still open
    fn handle_event(&mut self, event: Event, store: &mut dyn ScoreStore) -> Option<Option<Session>> {
        let Event::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match self.screen.handle(self.input_handler.auth_key(key), store) {
            AuthOutcome::Pending => None,
            AuthOutcome::LoggedIn(session) => Some(Some(session)),
            AuthOutcome::Quit => Some(None),
        }
    }
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new()
    }
}
