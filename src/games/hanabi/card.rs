//! Cards, colours and the closed-world card counts.

use serde::{Deserialize, Serialize};

/// Number of colours (suits).
pub const COLOUR_COUNT: usize = 5;

/// Highest card value.
pub const MAX_VALUE: u8 = 5;

/// Distinct (colour, value) pairs.
pub const CARD_KINDS: usize = COLOUR_COUNT * MAX_VALUE as usize;

/// Cards in a full deck.
pub const DECK_SIZE: usize = 50;

/// Highest achievable score: every pile complete.
pub const MAX_SCORE: u32 = (COLOUR_COUNT as u32) * (MAX_VALUE as u32);

/// Card colour. Ordinals follow the declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Colour {
    Red,
    Blue,
    Green,
    Orange,
    White,
}

impl Colour {
    /// All colours in ordinal order.
    pub const ALL: [Colour; COLOUR_COUNT] = [
        Colour::Red,
        Colour::Blue,
        Colour::Green,
        Colour::Orange,
        Colour::White,
    ];

    /// Position of this colour in [`Colour::ALL`].
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Colour with the given ordinal.
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Colour> {
        Self::ALL.get(ordinal).copied()
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Colour::Red => "red",
            Colour::Blue => "blue",
            Colour::Green => "green",
            Colour::Orange => "orange",
            Colour::White => "white",
        };
        f.write_str(name)
    }
}

/// A single card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub colour: Colour,
    /// Face value, 1..=5.
    pub value: u8,
}

impl Card {
    /// Create a card. Panics on a value outside 1..=5.
    #[must_use]
    pub fn new(colour: Colour, value: u8) -> Self {
        assert!((1..=MAX_VALUE).contains(&value), "card value must be 1-5");
        Self { colour, value }
    }

    /// Dense index in `[0, 25)`: `colour * 5 + (value - 1)`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.colour.ordinal() * MAX_VALUE as usize + (self.value as usize - 1)
    }

    /// Card with the given dense index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Card> {
        let colour = Colour::from_ordinal(index / MAX_VALUE as usize)?;
        Some(Card {
            colour,
            value: (index % MAX_VALUE as usize) as u8 + 1,
        })
    }

    /// Copies of this card in a full deck.
    #[must_use]
    pub const fn copies(self) -> u8 {
        copies_of_value(self.value)
    }

    /// Every distinct card, in index order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..CARD_KINDS).filter_map(Card::from_index)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.colour, self.value)
    }
}

/// Copies of each value per colour: three 1s, one 5, two of the rest.
#[must_use]
pub const fn copies_of_value(value: u8) -> u8 {
    match value {
        1 => 3,
        5 => 1,
        _ => 2,
    }
}

/// Per-card instance counts, indexed by [`Card::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardCounts([u8; CARD_KINDS]);

impl CardCounts {
    /// Empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts of a complete 50-card deck.
    #[must_use]
    pub fn full_deck() -> Self {
        let mut counts = Self::new();
        for card in Card::all() {
            counts.0[card.index()] = card.copies();
        }
        counts
    }

    /// Count the given cards.
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut counts = Self::new();
        for card in cards {
            counts.add(*card);
        }
        counts
    }

    #[inline]
    #[must_use]
    pub fn get(&self, card: Card) -> u8 {
        self.0[card.index()]
    }

    pub fn add(&mut self, card: Card) {
        self.0[card.index()] += 1;
    }

    /// Remove one instance; returns false if none was present.
    pub fn remove(&mut self, card: Card) -> bool {
        let slot = &mut self.0[card.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Total instances.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// Raw counts in card-index order.
    #[must_use]
    pub fn as_array(&self) -> &[u8; CARD_KINDS] {
        &self.0
    }

    /// Every instance, expanded, in card-index order.
    pub fn instances(&self) -> impl Iterator<Item = Card> + '_ {
        Card::all().flat_map(move |card| std::iter::repeat(card).take(self.get(card) as usize))
    }
}
