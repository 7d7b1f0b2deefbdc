//! Arcade Snake - a terminal Snake game with player accounts and a leaderboard
//!
//! This library provides:
//! - Core game logic, independent of any terminal (game module)
//! - Account forms and password hashing (auth module)
//! - Score persistence behind a swappable backend (store module)
//! - TUI rendering and key mapping (render, input modules)
//! - The async drivers that tie them together (modes module)

pub mod auth;
pub mod config;
pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;
pub mod sound;
pub mod store;
