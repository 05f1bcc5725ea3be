//! Canonical state keys and the model's feature layout.
//!
//! ## StateKey
//!
//! The public summary of a state from the searching agent's seat. Hands
//! and deck order are left out, so every determinization of the same
//! public history maps to the same key and shares statistics.
//!
//! ## Features
//!
//! | index            | feature                                         |
//! |------------------|-------------------------------------------------|
//! | 0                | player count / 5                                |
//! | 1                | info tokens / 8                                 |
//! | 2                | lives / 3                                       |
//! | 3..8             | cards played per value (1..=5) / 5              |
//! | 8..13            | pile height per colour / 5                      |
//! | 13..13+(pc-1)    | one-hot acting offset (offset k sets 13+k-1)    |
//!
//! Offset 0 is the searching agent itself and leaves the one-hot block
//! zero.

use serde::{Deserialize, Serialize};

use crate::core::{MAX_INFORMATION, MAX_LIVES, MAX_PLAYERS};
use crate::games::hanabi::{CardCounts, Colour, GameState, COLOUR_COUNT, MAX_VALUE};
use crate::nn::traits::EncodedState;

const FIXED_FEATURES: usize = 3 + MAX_VALUE as usize + COLOUR_COUNT;

/// Value-equal, hashable public summary of a state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub player_count: u8,
    pub information: u8,
    pub lives: u8,
    pub table: [u8; COLOUR_COUNT],
    /// Seat to act, relative to the searching agent.
    pub acting_offset: u8,
    pub score: u8,
    pub turn: u32,
    pub discards: CardCounts,
}

impl StateKey {
    /// Key of `state` with the seat `acting_offset` places after the
    /// searching agent to move.
    #[must_use]
    pub fn new(state: &GameState, acting_offset: usize) -> Self {
        let mut table = [0u8; COLOUR_COUNT];
        for colour in Colour::ALL {
            table[colour.ordinal()] = state.table_value(colour);
        }
        Self {
            player_count: state.player_count() as u8,
            information: state.information(),
            lives: state.lives(),
            table,
            acting_offset: acting_offset as u8,
            score: state.score() as u8,
            turn: state.turn_number(),
            discards: CardCounts::from_cards(state.discards().iter()),
        }
    }

    /// Successfully played cards per value, derived from pile heights.
    #[must_use]
    pub fn played_by_value(&self) -> [u8; MAX_VALUE as usize] {
        let mut counts = [0u8; MAX_VALUE as usize];
        for &height in &self.table {
            for count in counts.iter_mut().take(height as usize) {
                *count += 1;
            }
        }
        counts
    }
}

/// Builds model inputs from state keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Features for a table of `player_count`.
    #[must_use]
    pub const fn feature_count(player_count: usize) -> usize {
        FIXED_FEATURES + player_count.saturating_sub(1)
    }

    #[must_use]
    pub fn encode(&self, key: &StateKey) -> EncodedState {
        let player_count = key.player_count as usize;
        let mut tensor = Vec::with_capacity(Self::feature_count(player_count));

        tensor.push(player_count as f32 / MAX_PLAYERS as f32);
        tensor.push(key.information as f32 / MAX_INFORMATION as f32);
        tensor.push(key.lives as f32 / MAX_LIVES as f32);
        tensor.extend(
            key.played_by_value()
                .iter()
                .map(|&n| n as f32 / COLOUR_COUNT as f32),
        );
        tensor.extend(key.table.iter().map(|&h| h as f32 / MAX_VALUE as f32));

        let mut one_hot = vec![0.0f32; player_count.saturating_sub(1)];
        let offset = key.acting_offset as usize;
        if offset > 0 {
            if let Some(cell) = one_hot.get_mut(offset - 1) {
                *cell = 1.0;
            }
        }
        tensor.extend(one_hot);

        EncodedState::flat(tensor)
    }

    /// Shortcut for `encode(&StateKey::new(state, acting_offset))`.
    #[must_use]
    pub fn encode_state(&self, state: &GameState, acting_offset: usize) -> EncodedState {
        self.encode(&StateKey::new(state, acting_offset))
    }
}
