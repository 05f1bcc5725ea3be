//! Moves a seat can make.

use serde::{Deserialize, Serialize};

use super::card::{Colour, MAX_VALUE};
use super::state::GameState;
use crate::core::PlayerId;
use crate::error::GameError;

/// A Hanabi move. Hints name their target seat absolutely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Discard { slot: usize },
    Play { slot: usize },
    TellColour { target: PlayerId, colour: Colour },
    TellValue { target: PlayerId, value: u8 },
}

impl Action {
    /// Whether `player` may take this action in `state`.
    #[must_use]
    pub fn is_legal(&self, player: PlayerId, state: &GameState) -> bool {
        if player.index() >= state.player_count() {
            return false;
        }
        match *self {
            Action::Discard { slot } => {
                state.information() < state.config().max_information
                    && state.hand(player).has_card(slot)
            }
            Action::Play { slot } => state.hand(player).has_card(slot),
            Action::TellColour { target, colour } => {
                Self::can_hint(player, target, state) && state.hand(target).has_colour(colour)
            }
            Action::TellValue { target, value } => {
                (1..=MAX_VALUE).contains(&value)
                    && Self::can_hint(player, target, state)
                    && state.hand(target).has_value(value)
            }
        }
    }

    fn can_hint(player: PlayerId, target: PlayerId, state: &GameState) -> bool {
        state.information() > 0 && target != player && target.index() < state.player_count()
    }

    /// Apply this action for `player`, mutating `state`.
    ///
    /// Illegal actions leave the state untouched and return
    /// [`GameError::IllegalAction`].
    pub fn apply(&self, player: PlayerId, state: &mut GameState) -> Result<(), GameError> {
        if !self.is_legal(player, state) {
            return Err(GameError::IllegalAction {
                player,
                action: *self,
            });
        }
        match *self {
            Action::Discard { slot } => state.discard_from(player, slot),
            Action::Play { slot } => state.play_from(player, slot),
            Action::TellColour { target, colour } => state.tell_colour(target, colour),
            Action::TellValue { target, value } => state.tell_value(target, value),
        }
        state.end_turn();
        Ok(())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Discard { slot } => write!(f, "discard slot {slot}"),
            Action::Play { slot } => write!(f, "play slot {slot}"),
            Action::TellColour { target, colour } => write!(f, "tell {target} about {colour}"),
            Action::TellValue { target, value } => write!(f, "tell {target} about {value}s"),
        }
    }
}
