//! Determinization and action-id properties over played-out positions.

use proptest::prelude::*;

use hanabi_mcts::core::{GameRng, PlayerId};
use hanabi_mcts::games::hanabi::{CardCounts, GameState, DECK_SIZE};
use hanabi_mcts::mcts::{ActionCodec, Determinizer, ACTION_SPACE};
use hanabi_mcts::rules::legal_actions;

/// A game advanced `turns` random legal moves from a seeded deal.
fn position(player_count: usize, seed: u64, turns: usize) -> (GameState, PlayerId) {
    let mut state = GameState::new(player_count, seed).unwrap();
    let mut rng = GameRng::new(seed ^ 0x5eed);
    let mut player = PlayerId::new(0);
    for _ in 0..turns {
        if state.is_game_over() {
            break;
        }
        let legal = legal_actions(&state, player);
        let Some(&action) = rng.choose(&legal) else { break };
        action.apply(player, &mut state).unwrap();
        player = player.next(player_count);
    }
    (state, player)
}

// =============================================================================
// Determinizer
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sample_is_consistent_with_view(
        player_count in 2usize..=5,
        seed in any::<u64>(),
        turns in 0usize..40,
    ) {
        let (state, agent) = position(player_count, seed, turns);
        let view = state.observed_by(agent);
        let mut rng = GameRng::new(seed);

        let sampled = Determinizer::default().sample(&view, agent, &mut rng).unwrap();

        // Every other hand and the public piles are untouched.
        for other in PlayerId::all(player_count).filter(|&p| p != agent) {
            prop_assert_eq!(sampled.hand(other), view.hand(other));
        }
        prop_assert_eq!(sampled.public_cards(), view.public_cards());

        // Bound cards respect every hint the slot received.
        let hand = sampled.hand(agent);
        prop_assert_eq!(hand.hidden_slots().count(), 0);
        for (slot, card) in hand.known_cards() {
            prop_assert!(view.hand(agent).slot(slot).unwrap().admits(card));
        }

        // Hand plus deck is exactly the agent's unseen pool.
        let mut unseen = CardCounts::from_cards(sampled.deck().iter());
        for (_, card) in hand.known_cards() {
            unseen.add(card);
        }
        prop_assert_eq!(unseen, Determinizer::unseen_pool(&view, agent));
    }

    #[test]
    fn prop_every_card_accounted_for(
        player_count in 2usize..=5,
        seed in any::<u64>(),
        turns in 0usize..60,
    ) {
        let (state, agent) = position(player_count, seed, turns);
        let view = state.observed_by(agent);
        let mut rng = GameRng::new(seed.wrapping_add(1));
        let sampled = Determinizer::default().sample(&view, agent, &mut rng).unwrap();

        let in_hands: usize = PlayerId::all(player_count)
            .map(|p| sampled.hand(p).known_cards().count())
            .sum();
        let total = sampled.public_cards().total() + sampled.deck().len() + in_hands;
        prop_assert_eq!(total, DECK_SIZE);
    }
}

#[test]
fn test_sample_binds_every_hidden_slot() {
    let (state, agent) = position(3, 99, 10);
    let view = state.observed_by(agent);
    let hidden = view.hand(agent).hidden_slots().count();
    let mut rng = GameRng::new(5);

    let sampled = Determinizer::default().sample(&view, agent, &mut rng).unwrap();
    assert_eq!(sampled.hand(agent).hidden_slots().count(), 0);
    assert_eq!(sampled.hand(agent).known_cards().count(), hidden);
    assert_eq!(sampled.deck().len() + hidden, view.deck().len());
}

// =============================================================================
// Action Codec
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_legal_actions_round_trip(
        player_count in 2usize..=5,
        seed in any::<u64>(),
        turns in 0usize..40,
    ) {
        let (state, actor) = position(player_count, seed, turns);
        let codec = ActionCodec::new(player_count);

        for action in legal_actions(&state, actor) {
            let id = codec.encode(&action, actor).unwrap();
            prop_assert!(id.index() < ACTION_SPACE);
            prop_assert_eq!(codec.decode(id, actor).unwrap(), action);
        }
    }
}
