pub mod auth;
pub mod play;
pub mod terminal;

pub use auth::LoginGate;
pub use play::PlayMode;
