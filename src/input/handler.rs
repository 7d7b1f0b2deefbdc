use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::AuthKey;
use crate::game::{Direction, Intent, Phase};

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a game key press to an intent
    ///
    /// Space pauses a running game and restarts a finished one.
    pub fn handle_key_event(&self, key: KeyEvent, phase: Phase) -> Option<Intent> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }

        let intent = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Intent::Turn(Direction::Up),
            KeyCode::Down => Intent::Turn(Direction::Down),
            KeyCode::Left => Intent::Turn(Direction::Left),
            KeyCode::Right => Intent::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Intent::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Intent::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Intent::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Intent::Turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Intent::Quit,
            KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter
                if phase == Phase::GameOver =>
            {
                Intent::Restart
            }
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Intent::TogglePause,

            _ => return None,
        };
        Some(intent)
    }

    /// Map a key press on the login/signup screen
    pub fn auth_key(&self, key: KeyEvent) -> AuthKey {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => AuthKey::Quit,
            KeyCode::Char('s') if ctrl => AuthKey::SwitchMode,
            KeyCode::F(2) => AuthKey::SwitchMode,
            KeyCode::Esc => AuthKey::Quit,
            KeyCode::Enter => AuthKey::Submit,
            KeyCode::Tab | KeyCode::Down => AuthKey::NextField,
            KeyCode::BackTab | KeyCode::Up => AuthKey::PrevField,
            KeyCode::Backspace => AuthKey::Backspace,
            KeyCode::Char(c) if !ctrl => AuthKey::Insert(c),
            _ => AuthKey::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
