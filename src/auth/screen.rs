//! State behind the login/signup screen

use tracing::{info, warn};

use super::form::{AuthForm, AuthMode, Field, MAX_FIELD_LEN};
use crate::store::{ScoreStore, StoreError, UserId};

/// A logged-in player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Status line under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Editing operations the input layer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKey {
    Insert(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    SwitchMode,
    Quit,
    None,
}

/// Outcome of feeding one key to the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Pending,
    LoggedIn(Session),
    Quit,
}

pub struct AuthScreen {
    form: AuthForm,
    focus: usize,
    message: Option<Message>,
}

impl AuthScreen {
    pub fn new() -> Self {
        Self {
            form: AuthForm::empty(AuthMode::Login),
            focus: 0,
            message: Some(Message::new(
                MessageKind::Info,
                "Log in, or press F2 to create an account",
            )),
        }
    }

    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    pub fn mode(&self) -> AuthMode {
        self.form.mode()
    }

    pub fn focused(&self) -> Field {
        self.form.fields()[self.focus]
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Feed one key press
    pub fn handle(&mut self, key: AuthKey, store: &mut dyn ScoreStore) -> AuthOutcome {
        match key {
            AuthKey::Insert(c) => self.insert(c),
            AuthKey::Backspace => {
                let field = self.focused();
                if let Some(value) = self.form.value_mut(field) {
                    value.pop();
                }
            }
            AuthKey::NextField => self.focus = (self.focus + 1) % self.form.fields().len(),
            AuthKey::PrevField => {
                let count = self.form.fields().len();
                self.focus = (self.focus + count - 1) % count;
            }
            AuthKey::SwitchMode => {
                let next = match self.mode() {
                    AuthMode::Login => AuthMode::Signup,
                    AuthMode::Signup => AuthMode::Login,
                };
                self.switch_to(next);
            }
            AuthKey::Submit => return self.submit(store),
            AuthKey::Quit => return AuthOutcome::Quit,
            AuthKey::None => {}
        }
        AuthOutcome::Pending
    }

    fn insert(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let field = self.focused();
        if let Some(value) = self.form.value_mut(field) {
            if value.chars().count() < MAX_FIELD_LEN {
                value.push(c);
            }
        }
    }

    fn switch_to(&mut self, mode: AuthMode) {
        self.form = AuthForm::empty(mode);
        self.focus = 0;
        self.message = None;
    }

    fn submit(&mut self, store: &mut dyn ScoreStore) -> AuthOutcome {
        match &self.form {
            AuthForm::Login(form) => {
                if let Err(err) = form.validate() {
                    self.message = Some(Message::new(MessageKind::Error, err.to_string()));
                    return AuthOutcome::Pending;
                }
                let username = form.username.trim().to_string();
                match store.authenticate(&username, &form.password) {
                    Ok(user_id) => {
                        info!(%username, "login successful");
                        AuthOutcome::LoggedIn(Session { user_id, username })
                    }
                    Err(err) => {
                        self.fail(err);
                        AuthOutcome::Pending
                    }
                }
            }
            AuthForm::Signup(form) => {
                if let Err(err) = form.validate() {
                    self.message = Some(Message::new(MessageKind::Error, err.to_string()));
                    return AuthOutcome::Pending;
                }
                let result = store.create_user(form.username.trim(), form.email.trim(), &form.password);
                match result {
                    Ok(_) => {
                        self.switch_to(AuthMode::Login);
                        self.message = Some(Message::new(
                            MessageKind::Success,
                            "Account created successfully! Please log in.",
                        ));
                    }
                    Err(err) => self.fail(err),
                }
                AuthOutcome::Pending
            }
        }
    }

    fn fail(&mut self, err: StoreError) {
        if !matches!(err, StoreError::InvalidCredentials | StoreError::UserExists) {
            warn!(error = %err, "auth request failed");
        }
        self.message = Some(Message::new(MessageKind::Error, err.to_string()));
    }
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self::new()
    }
}
