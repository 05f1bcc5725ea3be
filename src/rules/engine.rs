//! Action enumeration.
//!
//! Candidates are generated in a fixed order (discards, plays, then hints
//! by target offset, colours before values) that matches ascending action
//! ids, and filtered by [`Action::is_legal`].

use crate::core::PlayerId;
use crate::games::hanabi::{Action, Colour, GameState, MAX_VALUE};

/// Hand slots addressable by discard/play actions.
pub const MAX_HAND_SLOTS: usize = 5;

/// Every action `actor` could ever take at a table of `player_count`,
/// legal or not, in action-id order.
#[must_use]
pub fn all_actions(actor: PlayerId, player_count: usize) -> Vec<Action> {
    let mut actions = Vec::with_capacity(2 * MAX_HAND_SLOTS + (player_count - 1) * 10);
    actions.extend((0..MAX_HAND_SLOTS).map(|slot| Action::Discard { slot }));
    actions.extend((0..MAX_HAND_SLOTS).map(|slot| Action::Play { slot }));
    for offset in 1..player_count {
        let target = actor.at_offset(offset, player_count);
        actions.extend(Colour::ALL.iter().map(|&colour| Action::TellColour { target, colour }));
        actions.extend((1..=MAX_VALUE).map(|value| Action::TellValue { target, value }));
    }
    actions
}

/// Legal actions for `actor` in `state`, in action-id order.
#[must_use]
pub fn legal_actions(state: &GameState, actor: PlayerId) -> Vec<Action> {
    all_actions(actor, state.player_count())
        .into_iter()
        .filter(|action| action.is_legal(actor, state))
        .collect()
}
