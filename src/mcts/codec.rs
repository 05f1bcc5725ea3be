//! Action ids relative to the acting seat.
//!
//! Layout of the 60-wide action space:
//!
//! | ids      | action                                             |
//! |----------|----------------------------------------------------|
//! | `0..5`   | discard slot `id`                                  |
//! | `5..10`  | play slot `id - 5`                                 |
//! | `10..60` | hint: `10 + colour` or `15 + (value - 1)`, plus `10 * offset` |
//!
//! `offset` is the target's seat relative to the actor, in
//! `1..player_count`, so ids `10..20` are never produced. Framing hints by
//! offset keeps the space seat-invariant: the same id means the same thing
//! to every seat, which is what lets one evaluator serve all of them.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::CodecError;
use crate::games::hanabi::{Action, Colour, COLOUR_COUNT, MAX_VALUE};
use crate::rules::MAX_HAND_SLOTS;

/// Width of the policy vector.
pub const ACTION_SPACE: usize = 60;

const PLAY_BASE: u8 = 5;
const HINT_BASE: u8 = 10;
const VALUE_BASE: u8 = HINT_BASE + COLOUR_COUNT as u8;
const OFFSET_STRIDE: u8 = 10;

/// Index into the action space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u8);

impl ActionId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action_{}", self.0)
    }
}

/// Encoder/decoder for one table size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionCodec {
    player_count: usize,
}

impl ActionCodec {
    #[must_use]
    pub const fn new(player_count: usize) -> Self {
        Self { player_count }
    }

    #[must_use]
    pub const fn player_count(&self) -> usize {
        self.player_count
    }

    /// Id of `action` taken by `actor`.
    pub fn encode(&self, action: &Action, actor: PlayerId) -> Result<ActionId, CodecError> {
        let unencodable = || CodecError::Unencodable {
            action: *action,
            actor,
        };
        match *action {
            Action::Discard { slot } if slot < MAX_HAND_SLOTS => Ok(ActionId(slot as u8)),
            Action::Play { slot } if slot < MAX_HAND_SLOTS => Ok(ActionId(PLAY_BASE + slot as u8)),
            Action::TellColour { target, colour } => {
                let offset = self.hint_offset(actor, target).ok_or_else(unencodable)?;
                Ok(ActionId(HINT_BASE + colour.ordinal() as u8 + OFFSET_STRIDE * offset))
            }
            Action::TellValue { target, value } if (1..=MAX_VALUE).contains(&value) => {
                let offset = self.hint_offset(actor, target).ok_or_else(unencodable)?;
                Ok(ActionId(VALUE_BASE + (value - 1) + OFFSET_STRIDE * offset))
            }
            _ => Err(unencodable()),
        }
    }

    /// Action for `id` taken by `actor`.
    pub fn decode(&self, id: ActionId, actor: PlayerId) -> Result<Action, CodecError> {
        let raw = id.0;
        if raw as usize >= ACTION_SPACE {
            return Err(CodecError::OutOfRange(raw));
        }
        if raw < PLAY_BASE {
            return Ok(Action::Discard { slot: raw as usize });
        }
        if raw < HINT_BASE {
            return Ok(Action::Play {
                slot: (raw - PLAY_BASE) as usize,
            });
        }

        let relative = raw - HINT_BASE;
        let offset = (relative / OFFSET_STRIDE) as usize;
        if offset == 0 || offset >= self.player_count {
            return Err(CodecError::InvalidOffset {
                id: raw,
                offset,
                player_count: self.player_count,
            });
        }
        let target = actor.at_offset(offset, self.player_count);
        let kind = relative % OFFSET_STRIDE;
        match Colour::from_ordinal(kind as usize) {
            Some(colour) => Ok(Action::TellColour { target, colour }),
            None => Ok(Action::TellValue {
                target,
                value: kind - COLOUR_COUNT as u8 + 1,
            }),
        }
    }

    fn hint_offset(&self, actor: PlayerId, target: PlayerId) -> Option<u8> {
        if target.index() >= self.player_count {
            return None;
        }
        let offset = actor.offset_to(target, self.player_count);
        (offset != 0).then_some(offset as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::all_actions;

    #[test]
    fn test_fixed_ids() {
        let codec = ActionCodec::new(4);
        let actor = PlayerId::new(3);

        assert_eq!(codec.encode(&Action::Discard { slot: 2 }, actor).unwrap(), ActionId(2));
        assert_eq!(codec.encode(&Action::Play { slot: 4 }, actor).unwrap(), ActionId(9));

        // Seat 1 is two places after seat 3 at a four-seat table.
        let tell_green = Action::TellColour { target: PlayerId::new(1), colour: Colour::Green };
        assert_eq!(codec.encode(&tell_green, actor).unwrap(), ActionId(10 + 2 + 20));

        let tell_five = Action::TellValue { target: PlayerId::new(0), value: 5 };
        assert_eq!(codec.encode(&tell_five, actor).unwrap(), ActionId(15 + 4 + 10));
    }

    #[test]
    fn test_ids_follow_enumeration_order() {
        for player_count in 2..=5 {
            let codec = ActionCodec::new(player_count);
            for actor in PlayerId::all(player_count) {
                let ids: Vec<_> = all_actions(actor, player_count)
                    .iter()
                    .map(|a| codec.encode(a, actor).unwrap())
                    .collect();
                assert!(ids.windows(2).all(|w| w[0] < w[1]));
                assert!(ids.iter().all(|id| id.index() < ACTION_SPACE));
            }
        }
    }

    #[test]
    fn test_self_hint_is_unencodable() {
        let codec = ActionCodec::new(3);
        let actor = PlayerId::new(1);
        let action = Action::TellValue { target: actor, value: 2 };
        assert!(matches!(codec.encode(&action, actor), Err(CodecError::Unencodable { .. })));
    }

    #[test]
    fn test_decode_rejects_offset_zero_and_beyond_table() {
        let codec = ActionCodec::new(2);
        let actor = PlayerId::new(0);
        assert!(matches!(
            codec.decode(ActionId(12), actor),
            Err(CodecError::InvalidOffset { offset: 0, .. })
        ));
        assert!(matches!(
            codec.decode(ActionId(31), actor),
            Err(CodecError::InvalidOffset { offset: 2, .. })
        ));
        assert!(matches!(codec.decode(ActionId(60), actor), Err(CodecError::OutOfRange(60))));
    }

    #[test]
    fn test_every_decodable_id_encodes_back() {
        for player_count in 2..=5 {
            let codec = ActionCodec::new(player_count);
            for actor in PlayerId::all(player_count) {
                for raw in 0..ACTION_SPACE as u8 {
                    let id = ActionId(raw);
                    let offset = raw.saturating_sub(HINT_BASE) / OFFSET_STRIDE;
                    let hint_to_nobody =
                        raw >= HINT_BASE && (offset == 0 || offset as usize >= player_count);

                    match codec.decode(id, actor) {
                        Ok(action) => {
                            assert!(!hint_to_nobody, "{} decoded for {} players", id, player_count);
                            assert_eq!(codec.encode(&action, actor).unwrap(), id);
                        }
                        Err(err) => {
                            assert!(hint_to_nobody, "{} rejected for {} players", id, player_count);
                            assert!(matches!(err, CodecError::InvalidOffset { .. }));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_id_same_meaning_for_every_seat() {
        let codec = ActionCodec::new(5);
        for actor in PlayerId::all(5) {
            let action = codec.decode(ActionId(43), actor).unwrap();
            // 43 = 10 + 10 * 3 + 3: tell colour Orange to the seat three places on.
            assert_eq!(
                action,
                Action::TellColour { target: actor.at_offset(3, 5), colour: Colour::Orange }
            );
        }
    }
}
