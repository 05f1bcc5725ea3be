//! Sampling the searching agent's hidden cards.
//!
//! A determinization turns the agent's observed view into one concrete
//! full-information state:
//!
//! 1. [`Determinizer::compute_slot_candidates`]: for every hidden slot, the
//!    card instances from the unseen pool that agree with the slot's hints.
//! 2. [`Determinizer::order_slots`]: most constrained slot first.
//! 3. [`Determinizer::bind`]: draw one instance per slot, without
//!    replacement across slots.
//! 4. [`Determinizer::apply`]: write the binding into a copy of the state
//!    and shuffle the cards left in the deck.
//!
//! Greedy binding can paint itself into a corner (a later slot's candidates
//! all taken by earlier draws), so [`Determinizer::sample`] retries a
//! bounded number of times.

use tracing::trace;

use crate::core::{GameRng, PlayerId};
use crate::error::DeterminizationError;
use crate::games::hanabi::{Card, CardCounts, GameState, Hand, SlotCard};

/// Card instances a hidden slot may hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotCandidates {
    pub slot: usize,
    pub cards: CardCounts,
}

impl SlotCandidates {
    /// Number of candidate instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hand slot paired with the card bound to it.
pub type Binding = Vec<(usize, Card)>;

/// Samples hint-consistent deals of the agent's own hand.
#[derive(Clone, Copy, Debug)]
pub struct Determinizer {
    max_attempts: usize,
}

impl Default for Determinizer {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Determinizer {
    /// A determinizer that gives up after `max_attempts` failed bindings.
    #[must_use]
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Cards `agent` cannot see: the full deck minus the played piles, the
    /// discard pile and every visible card in any hand.
    #[must_use]
    pub fn unseen_pool(state: &GameState, agent: PlayerId) -> CardCounts {
        let mut pool = CardCounts::full_deck();
        for card in state.public_cards().instances() {
            pool.remove(card);
        }
        // The agent's own slots only hold visible cards in a full-information
        // state; those are excluded too so the pool is the same either way.
        for player in PlayerId::all(state.player_count()) {
            for (_, card) in state.hand(player).known_cards() {
                pool.remove(card);
            }
        }
        trace!(%agent, unseen = pool.total(), "unseen pool");
        pool
    }

    /// Candidates for every hidden slot of `hand`, in slot order.
    #[must_use]
    pub fn compute_slot_candidates(hand: &Hand, pool: &CardCounts) -> Vec<SlotCandidates> {
        hand.slots()
            .enumerate()
            .filter(|(_, slot)| slot.card == SlotCard::Hidden)
            .map(|(index, slot)| {
                let mut cards = CardCounts::new();
                for card in Card::all().filter(|&c| slot.admits(c)) {
                    for _ in 0..pool.get(card) {
                        cards.add(card);
                    }
                }
                SlotCandidates { slot: index, cards }
            })
            .collect()
    }

    /// Positions into `candidates`, fewest candidates first, ties by slot.
    #[must_use]
    pub fn order_slots(candidates: &[SlotCandidates]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by_key(|&i| (candidates[i].len(), candidates[i].slot));
        order
    }

    /// Draw one card per slot in `order`, never reusing an instance.
    pub fn bind(
        order: &[usize],
        candidates: &[SlotCandidates],
        rng: &mut GameRng,
    ) -> Result<Binding, DeterminizationError> {
        let mut used = CardCounts::new();
        let mut binding = Binding::with_capacity(order.len());

        for &position in order {
            let entry = &candidates[position];
            let remaining = |card: Card| entry.cards.get(card).saturating_sub(used.get(card)) as usize;
            let total: usize = Card::all().map(remaining).sum();
            if total == 0 {
                return Err(DeterminizationError::EmptyCandidates { slot: entry.slot });
            }

            // Uniform over instances, not over distinct cards.
            let mut pick = rng.gen_range_usize(0..total);
            let card = Card::all()
                .find(|&card| {
                    let copies = remaining(card);
                    if pick < copies {
                        true
                    } else {
                        pick -= copies;
                        false
                    }
                })
                .ok_or(DeterminizationError::EmptyCandidates { slot: entry.slot })?;
            used.add(card);
            binding.push((entry.slot, card));
        }
        Ok(binding)
    }

    /// Copy of `state` with `binding` written into `agent`'s hand, the bound
    /// instances taken out of the deck and the rest of the deck shuffled.
    pub fn apply(
        state: &GameState,
        agent: PlayerId,
        binding: &[(usize, Card)],
        rng: &mut GameRng,
    ) -> Result<GameState, DeterminizationError> {
        let mut sampled = state.clone();
        for &(slot, card) in binding {
            if !sampled.bind_hidden(agent, slot, card) {
                return Err(DeterminizationError::EmptyCandidates { slot });
            }
        }
        sampled.shuffle_deck(rng);
        Ok(sampled)
    }

    /// Full determinization of `state` (the agent's observed view).
    pub fn sample(
        &self,
        state: &GameState,
        agent: PlayerId,
        rng: &mut GameRng,
    ) -> Result<GameState, DeterminizationError> {
        let pool = Self::unseen_pool(state, agent);
        let candidates = Self::compute_slot_candidates(state.hand(agent), &pool);
        let order = Self::order_slots(&candidates);

        for attempt in 1..=self.max_attempts {
            match Self::bind(&order, &candidates, rng) {
                Ok(binding) => return Self::apply(state, agent, &binding, rng),
                Err(err) => trace!(%agent, attempt, error = %err, "binding failed"),
            }
        }
        Err(DeterminizationError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }
}
