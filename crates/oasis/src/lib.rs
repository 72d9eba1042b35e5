//! # Oasis
//!
//! Desert exploration game: fly through the dunes, collect every orb, and
//! stay clear of the ground and the chasers.
//!
//! The crate is split the same way the game runs:
//! - [`config`]: every tunable, loadable from TOML or RON
//! - [`world`]: level setup from registered resources
//! - [`player`]: flight model
//! - [`collisions`]: per-tick collision sweep
//! - [`game_state`]: state machine and end-screen dwell timers
//! - [`hud`]: overlay screen and orb counter
//! - [`app`]: game loop and the platform boundary

pub mod app;
pub mod collisions;
pub mod config;
pub mod error;
pub mod game_state;
pub mod hud;
pub mod player;
pub mod world;

#[cfg(test)]
mod tests;

pub use app::{Game, HeadlessPlatform, Platform, PlatformCommand, RunSummary};
pub use config::GameConfig;
pub use error::GameError;
pub use game_state::GameState;
