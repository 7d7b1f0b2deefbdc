//! Login/signup gate in front of the game

pub mod form;
pub mod password;
pub mod screen;

pub use form::{AuthForm, AuthMode, Field, LoginForm, SignupForm, ValidationError};
pub use screen::{AuthKey, AuthOutcome, AuthScreen, Message, MessageKind, Session};
