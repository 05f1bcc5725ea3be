//! Game configuration.
//!
//! Hanabi rules are fixed apart from the seat count, which also decides
//! the hand size. Token limits are kept in the config so tests can build
//! edge-case tables without touching the rules code.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 5;

/// Info tokens available at the start of a game.
pub const MAX_INFORMATION: u8 = 8;

/// Lives (fuse tokens) available at the start of a game.
pub const MAX_LIVES: u8 = 3;

/// Rules parameters for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (2-5).
    pub player_count: usize,

    /// Cards dealt to each seat.
    pub hand_size: usize,

    /// Info token cap.
    pub max_information: u8,

    /// Starting lives.
    pub max_lives: u8,
}

impl GameConfig {
    /// Standard rules for the given table size.
    ///
    /// Hand size is 5 for 2-3 players and 4 for 4-5 players.
    pub fn new(player_count: usize) -> Result<Self, ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(ConfigError::PlayerCount(player_count));
        }
        Ok(Self {
            player_count,
            hand_size: Self::standard_hand_size(player_count),
            max_information: MAX_INFORMATION,
            max_lives: MAX_LIVES,
        })
    }

    /// Hand size used by the standard rules.
    #[must_use]
    pub const fn standard_hand_size(player_count: usize) -> usize {
        if player_count <= 3 {
            5
        } else {
            4
        }
    }
}
