//! Hands and per-slot hint knowledge.
//!
//! Each slot remembers which colours and values are still possible given
//! every hint its current card has received, positive and negative. A
//! fresh draw resets the slot's knowledge.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Colour, MAX_VALUE};

const ALL_COLOURS: u8 = 0b1_1111;
const ALL_VALUES: u8 = 0b1_1111;

/// What occupies a hand slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotCard {
    /// No card (the deck ran out).
    Empty,
    /// A card the observer cannot see.
    Hidden,
    /// A visible (or bound) card.
    Known(Card),
}

/// One hand position with its hint knowledge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub card: SlotCard,
    colours: u8,
    values: u8,
}

impl Slot {
    fn fresh(card: SlotCard) -> Self {
        Self {
            card,
            colours: ALL_COLOURS,
            values: ALL_VALUES,
        }
    }

    /// Whether `colour` is still possible for this slot.
    #[must_use]
    pub fn colour_possible(&self, colour: Colour) -> bool {
        self.colours & (1 << colour.ordinal()) != 0
    }

    /// Whether `value` is still possible for this slot.
    #[must_use]
    pub fn value_possible(&self, value: u8) -> bool {
        (1..=MAX_VALUE).contains(&value) && self.values & (1 << (value - 1)) != 0
    }

    /// Whether `card` is consistent with every hint received.
    #[must_use]
    pub fn admits(&self, card: Card) -> bool {
        self.colour_possible(card.colour) && self.value_possible(card.value)
    }

    /// The colour, if hints pin it down.
    #[must_use]
    pub fn known_colour(&self) -> Option<Colour> {
        (self.colours.count_ones() == 1)
            .then(|| Colour::from_ordinal(self.colours.trailing_zeros() as usize))
            .flatten()
    }

    /// The value, if hints pin it down.
    #[must_use]
    pub fn known_value(&self) -> Option<u8> {
        (self.values.count_ones() == 1).then(|| self.values.trailing_zeros() as u8 + 1)
    }
}

/// A seat's hand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand {
    slots: SmallVec<[Slot; 5]>,
}

impl Hand {
    /// A hand of `size` empty slots.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| Slot::fresh(SlotCard::Empty)).collect(),
        }
    }

    /// Number of slots (occupied or not).
    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<&Slot> {
        self.slots.get(slot)
    }

    /// Iterate over slots in order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// The visible card in a slot.
    #[must_use]
    pub fn card(&self, slot: usize) -> Option<Card> {
        match self.slots.get(slot)?.card {
            SlotCard::Known(card) => Some(card),
            _ => None,
        }
    }

    /// Whether a slot holds a card, seen or not.
    #[must_use]
    pub fn has_card(&self, slot: usize) -> bool {
        matches!(
            self.slots.get(slot).map(|s| s.card),
            Some(SlotCard::Hidden | SlotCard::Known(_))
        )
    }

    /// Visible cards with their slot index.
    pub fn known_cards(&self) -> impl Iterator<Item = (usize, Card)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| match s.card {
            SlotCard::Known(card) => Some((i, card)),
            _ => None,
        })
    }

    /// Slots holding a card the observer cannot see.
    pub fn hidden_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.card == SlotCard::Hidden)
            .map(|(i, _)| i)
    }

    /// Put a freshly drawn card in a slot, resetting its knowledge.
    pub fn draw_into(&mut self, slot: usize, card: SlotCard) {
        self.slots[slot] = Slot::fresh(card);
    }

    /// Reveal a hidden slot's card, keeping its hint knowledge.
    pub fn bind(&mut self, slot: usize, card: Card) {
        self.slots[slot].card = SlotCard::Known(card);
    }

    /// Overwrite a slot's knowledge with the given possibilities.
    #[cfg(test)]
    pub(crate) fn restrict(&mut self, slot: usize, colours: &[Colour], values: &[u8]) {
        let knowledge = &mut self.slots[slot];
        knowledge.colours = colours.iter().fold(0u8, |mask, c| mask | 1 << c.ordinal());
        knowledge.values = values.iter().fold(0u8, |mask, &v| mask | 1 << (v - 1));
    }

    /// Remove the card from a slot, leaving it empty.
    pub fn take(&mut self, slot: usize) -> SlotCard {
        std::mem::replace(&mut self.slots[slot], Slot::fresh(SlotCard::Empty)).card
    }

    /// Turn every visible card into a hidden one; returns the cards removed.
    pub fn hide(&mut self) -> Vec<Card> {
        let mut hidden = Vec::new();
        for slot in &mut self.slots {
            if let SlotCard::Known(card) = slot.card {
                slot.card = SlotCard::Hidden;
                hidden.push(card);
            }
        }
        hidden
    }

    /// Whether any visible card has this colour.
    #[must_use]
    pub fn has_colour(&self, colour: Colour) -> bool {
        self.known_cards().any(|(_, c)| c.colour == colour)
    }

    /// Whether any visible card has this value.
    #[must_use]
    pub fn has_value(&self, value: u8) -> bool {
        self.known_cards().any(|(_, c)| c.value == value)
    }

    /// Record a colour hint on every visible card.
    pub fn tell_colour(&mut self, colour: Colour) {
        let bit = 1 << colour.ordinal();
        for slot in &mut self.slots {
            if let SlotCard::Known(card) = slot.card {
                if card.colour == colour {
                    slot.colours = bit;
                } else {
                    slot.colours &= !bit;
                }
            }
        }
    }

    /// Record a value hint on every visible card.
    pub fn tell_value(&mut self, value: u8) {
        let bit = 1 << (value - 1);
        for slot in &mut self.slots {
            if let SlotCard::Known(card) = slot.card {
                if card.value == value {
                    slot.values = bit;
                } else {
                    slot.values &= !bit;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_of(cards: &[Card]) -> Hand {
        let mut hand = Hand::new(cards.len());
        for (i, &card) in cards.iter().enumerate() {
            hand.draw_into(i, SlotCard::Known(card));
        }
        hand
    }

    #[test]
    fn test_new_hand_is_empty() {
        let hand = Hand::new(4);
        assert_eq!(hand.size(), 4);
        assert!((0..4).all(|i| !hand.has_card(i)));
    }

    #[test]
    fn test_colour_hint_positive_and_negative() {
        let mut hand = hand_of(&[Card::new(Colour::Red, 1), Card::new(Colour::Blue, 2)]);
        hand.tell_colour(Colour::Red);

        let red = hand.slot(0).unwrap();
        assert_eq!(red.known_colour(), Some(Colour::Red));
        assert!(!red.colour_possible(Colour::Blue));

        let blue = hand.slot(1).unwrap();
        assert!(!blue.colour_possible(Colour::Red));
        assert!(blue.colour_possible(Colour::Blue));
        assert_eq!(blue.known_colour(), None);
    }

    #[test]
    fn test_value_hint() {
        let mut hand = hand_of(&[Card::new(Colour::Red, 5), Card::new(Colour::Blue, 2)]);
        hand.tell_value(5);

        assert_eq!(hand.slot(0).unwrap().known_value(), Some(5));
        assert!(!hand.slot(1).unwrap().value_possible(5));
        assert!(hand.slot(1).unwrap().admits(Card::new(Colour::Green, 2)));
    }

    #[test]
    fn test_draw_resets_knowledge() {
        let mut hand = hand_of(&[Card::new(Colour::Red, 5)]);
        hand.tell_value(5);
        hand.draw_into(0, SlotCard::Known(Card::new(Colour::Red, 3)));
        assert_eq!(hand.slot(0).unwrap().known_value(), None);
    }

    #[test]
    fn test_hide_keeps_knowledge() {
        let mut hand = hand_of(&[Card::new(Colour::Green, 1), Card::new(Colour::White, 4)]);
        hand.tell_colour(Colour::Green);
        let removed = hand.hide();

        assert_eq!(removed.len(), 2);
        assert_eq!(hand.hidden_slots().collect::<Vec<_>>(), vec![0, 1]);
        assert!(hand.has_card(0));
        assert_eq!(hand.card(0), None);
        assert_eq!(hand.slot(0).unwrap().known_colour(), Some(Colour::Green));

        hand.bind(0, Card::new(Colour::Green, 3));
        assert_eq!(hand.slot(0).unwrap().known_colour(), Some(Colour::Green));
        assert_eq!(hand.card(0), Some(Card::new(Colour::Green, 3)));
    }

    #[test]
    fn test_take_leaves_empty_slot() {
        let mut hand = hand_of(&[Card::new(Colour::Orange, 2)]);
        assert_eq!(hand.take(0), SlotCard::Known(Card::new(Colour::Orange, 2)));
        assert!(!hand.has_card(0));
    }
}
