//! Full-information game state.
//!
//! ## GameState
//!
//! Everything a simulation needs: deck order, every hand, played piles,
//! discards, token counts and the end-of-deck countdown. Deck and discard
//! pile use `im` persistent vectors so the per-iteration clone the search
//! makes is cheap.
//!
//! ## Observed views
//!
//! [`GameState::observed_by`] produces what one seat actually knows: its
//! own cards become hidden and rejoin the unseen pool (the deck), while
//! hint knowledge on those slots is kept.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardCounts, Colour, COLOUR_COUNT, MAX_SCORE, MAX_VALUE};
use super::hand::{Hand, SlotCard};
use crate::core::{GameConfig, GameRng, PlayerId, PlayerMap};
use crate::error::ConfigError;

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    deck: Vector<Card>,
    hands: PlayerMap<Hand>,
    table: [u8; COLOUR_COUNT],
    discards: Vector<Card>,
    information: u8,
    lives: u8,
    turn: u32,
    /// Turns left once the deck has run out.
    turns_left: Option<usize>,
}

impl GameState {
    /// Shuffle a full deck with `seed` and deal a standard game.
    pub fn new(player_count: usize, seed: u64) -> Result<Self, ConfigError> {
        let config = GameConfig::new(player_count)?;
        let mut rng = GameRng::new(seed);
        Ok(Self::deal(config, &mut rng))
    }

    /// Shuffle a full deck with `rng` and deal.
    pub fn deal(config: GameConfig, rng: &mut GameRng) -> Self {
        let mut cards: Vec<Card> = CardCounts::full_deck().instances().collect();
        rng.shuffle(&mut cards);
        Self::with_deck(config, cards)
    }

    /// Deal from a fixed deck order: the first card dealt is `deck[0]`,
    /// hands are filled seat by seat, slot by slot.
    pub fn with_deck(config: GameConfig, deck: Vec<Card>) -> Self {
        let player_count = config.player_count;
        let hand_size = config.hand_size;
        let mut state = Self {
            deck: deck.into_iter().collect(),
            hands: PlayerMap::new(player_count, |_| Hand::new(hand_size)),
            table: [0; COLOUR_COUNT],
            discards: Vector::new(),
            information: config.max_information,
            lives: config.max_lives,
            turn: 0,
            turns_left: None,
            config,
        };
        for player in PlayerId::all(player_count) {
            for slot in 0..hand_size {
                state.draw(player, slot);
            }
        }
        state
    }

    // === Views ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player]
    }

    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self, player: PlayerId) -> &mut Hand {
        &mut self.hands[player]
    }

    /// Undrawn cards, top of the deck first.
    #[must_use]
    pub fn deck(&self) -> &Vector<Card> {
        &self.deck
    }

    #[must_use]
    pub fn discards(&self) -> &Vector<Card> {
        &self.discards
    }

    /// Height of the played pile for a colour.
    #[must_use]
    pub fn table_value(&self, colour: Colour) -> u8 {
        self.table[colour.ordinal()]
    }

    /// Info tokens available.
    #[must_use]
    pub fn information(&self) -> u8 {
        self.information
    }

    #[must_use]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    /// Sum of the played piles.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.table.iter().map(|&h| h as u32).sum()
    }

    /// Lives exhausted, every pile complete, or the final round played out.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.lives == 0 || self.score() == MAX_SCORE || self.turns_left == Some(0)
    }

    /// Cards successfully played, by value.
    #[must_use]
    pub fn played_by_value(&self) -> [u8; MAX_VALUE as usize] {
        let mut counts = [0u8; MAX_VALUE as usize];
        for &height in &self.table {
            for value in 0..height as usize {
                counts[value] += 1;
            }
        }
        counts
    }

    /// Cards visible on the table: played piles plus the discard pile.
    #[must_use]
    pub fn public_cards(&self) -> CardCounts {
        let mut counts = CardCounts::from_cards(self.discards.iter());
        for colour in Colour::ALL {
            for value in 1..=self.table_value(colour) {
                counts.add(Card::new(colour, value));
            }
        }
        counts
    }

    /// The state as `agent` sees it: own cards hidden and returned to the
    /// unseen pool. Idempotent.
    #[must_use]
    pub fn observed_by(&self, agent: PlayerId) -> GameState {
        let mut view = self.clone();
        let hidden = view.hands[agent].hide();
        view.deck.extend(hidden);
        view
    }

    // === Mutation (through Action::apply and the determinizer) ===

    pub(crate) fn discard_from(&mut self, player: PlayerId, slot: usize) {
        if let SlotCard::Known(card) = self.hands[player].take(slot) {
            self.discards.push_back(card);
        }
        self.information = (self.information + 1).min(self.config.max_information);
        self.draw(player, slot);
    }

    pub(crate) fn play_from(&mut self, player: PlayerId, slot: usize) {
        if let SlotCard::Known(card) = self.hands[player].take(slot) {
            let pile = &mut self.table[card.colour.ordinal()];
            if *pile + 1 == card.value {
                *pile += 1;
                if card.value == MAX_VALUE {
                    self.information = (self.information + 1).min(self.config.max_information);
                }
            } else {
                self.lives = self.lives.saturating_sub(1);
                self.discards.push_back(card);
            }
        }
        self.draw(player, slot);
    }

    pub(crate) fn tell_colour(&mut self, target: PlayerId, colour: Colour) {
        self.information -= 1;
        self.hands[target].tell_colour(colour);
    }

    pub(crate) fn tell_value(&mut self, target: PlayerId, value: u8) {
        self.information -= 1;
        self.hands[target].tell_value(value);
    }

    pub(crate) fn end_turn(&mut self) {
        self.turn += 1;
        if let Some(left) = self.turns_left.as_mut() {
            *left = left.saturating_sub(1);
        }
    }

    fn draw(&mut self, player: PlayerId, slot: usize) {
        match self.deck.pop_front() {
            Some(card) => {
                self.hands[player].draw_into(slot, SlotCard::Known(card));
                if self.deck.is_empty() && self.turns_left.is_none() {
                    // Every seat, the drawer included, gets one more turn;
                    // the drawer's current turn is consumed by end_turn.
                    self.turns_left = Some(self.config.player_count + 1);
                }
            }
            None => {
                self.hands[player].draw_into(slot, SlotCard::Empty);
                if self.turns_left.is_none() {
                    self.turns_left = Some(self.config.player_count);
                }
            }
        }
    }

    /// Reveal a hidden card in `agent`'s hand and take that instance out of
    /// the unseen pool. Returns false if the pool has no such card.
    pub(crate) fn bind_hidden(&mut self, agent: PlayerId, slot: usize, card: Card) -> bool {
        match self.deck.index_of(&card) {
            Some(position) => {
                self.deck.remove(position);
                self.hands[agent].bind(slot, card);
                true
            }
            None => false,
        }
    }

    /// Uniformly reorder the undrawn cards.
    pub(crate) fn shuffle_deck(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.deck.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.deck = cards.into_iter().collect();
    }
}
