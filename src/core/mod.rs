//! Core engine types: seats, RNG, configuration.
//!
//! These are game-agnostic building blocks shared by the Hanabi rules
//! and the search.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{GameConfig, MAX_INFORMATION, MAX_LIVES, MAX_PLAYERS, MIN_PLAYERS};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
