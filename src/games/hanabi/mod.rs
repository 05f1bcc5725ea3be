//! Hanabi rules: the reference game collaborator the search drives.
//!
//! Cooperative play with hidden hands: every seat sees all hands but its
//! own. On a turn a seat either plays a card onto the coloured piles,
//! discards one to regain an info token, or spends a token to tell
//! another seat which of their cards share a colour or value.
//!
//! - 50 cards: five colours, values 1-5 (three 1s, two each of 2-4, one 5)
//! - 8 info tokens, 3 lives
//! - Score is the sum of the pile heights (max 25)
//! - After the last card is drawn every seat takes one more turn

mod action;
mod card;
mod hand;
mod state;

pub use action::Action;
pub use card::{
    copies_of_value, Card, CardCounts, Colour, CARD_KINDS, COLOUR_COUNT, DECK_SIZE, MAX_SCORE,
    MAX_VALUE,
};
pub use hand::{Hand, Slot, SlotCard};
pub use state::GameState;
