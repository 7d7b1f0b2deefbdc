//! Terminal drawing for the game and the auth screen

pub mod auth;
pub mod renderer;

pub use auth::render_auth;
pub use renderer::{Hud, Renderer};
