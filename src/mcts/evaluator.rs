//! Leaf evaluation: random rollouts or a learned policy/value model.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::core::{GameRng, PlayerId};
use crate::error::GameError;
use crate::games::hanabi::{GameState, MAX_SCORE};
use crate::nn::{FeatureEncoder, PolicyValueNetwork, Prediction, StateKey};
use crate::rules::legal_actions;

/// Where the evaluated state sits relative to the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafContext {
    /// Seat running the search.
    pub searcher: PlayerId,
    /// Seat to move at the leaf.
    pub to_move: PlayerId,
}

impl LeafContext {
    /// `to_move` relative to the searcher.
    #[must_use]
    pub fn acting_offset(&self, player_count: usize) -> usize {
        self.searcher.offset_to(self.to_move, player_count)
    }
}

/// Result of evaluating one leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafValue {
    /// Estimated final score, in `[0, 25]`.
    pub value: f64,
    /// Moves simulated to get there (rollouts only).
    pub moves: u32,
}

/// Estimates the final score reachable from a leaf.
pub trait LeafEvaluator: Send + Sync {
    /// `state` belongs to the current iteration and may be consumed.
    fn evaluate(
        &self,
        state: &mut GameState,
        ctx: &LeafContext,
        rng: &mut GameRng,
    ) -> Result<LeafValue, GameError>;
}

/// Uniformly random play, round-robin from the seat to move.
#[derive(Clone, Copy, Debug)]
pub struct RolloutEvaluator {
    max_moves: u32,
}

impl RolloutEvaluator {
    #[must_use]
    pub fn new(max_moves: u32) -> Self {
        Self { max_moves }
    }
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new(18)
    }
}

impl LeafEvaluator for RolloutEvaluator {
    fn evaluate(
        &self,
        state: &mut GameState,
        ctx: &LeafContext,
        rng: &mut GameRng,
    ) -> Result<LeafValue, GameError> {
        let player_count = state.player_count();
        let mut player = ctx.to_move;
        let mut moves = 0;

        while !state.is_game_over() && moves < self.max_moves {
            let actions = legal_actions(state, player);
            let Some(action) = rng.choose(&actions) else {
                break;
            };
            action.apply(player, state)?;
            player = player.next(player_count);
            moves += 1;
        }

        Ok(LeafValue {
            value: state.score() as f64,
            moves,
        })
    }
}

/// One forward pass of an external model per leaf.
///
/// A model that fails is treated as neutral (zero prior, zero value) and
/// reported once.
pub struct NetworkEvaluator<N: PolicyValueNetwork> {
    network: N,
    encoder: FeatureEncoder,
    warned: AtomicBool,
}

impl<N: PolicyValueNetwork> NetworkEvaluator<N> {
    pub fn new(network: N) -> Self {
        Self {
            network,
            encoder: FeatureEncoder,
            warned: AtomicBool::new(false),
        }
    }

    /// Prediction for `key`, degraded to neutral on failure.
    pub fn predict(&self, key: &StateKey) -> Prediction {
        let encoded = self.encoder.encode(key);
        match self.network.predict(&encoded).and_then(Prediction::validate) {
            Ok(prediction) => prediction,
            Err(err) => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    warn!(error = %err, "evaluator failed, using neutral prior and value");
                }
                Prediction::neutral()
            }
        }
    }
}

impl<N: PolicyValueNetwork> LeafEvaluator for NetworkEvaluator<N> {
    fn evaluate(
        &self,
        state: &mut GameState,
        ctx: &LeafContext,
        _rng: &mut GameRng,
    ) -> Result<LeafValue, GameError> {
        let key = StateKey::new(state, ctx.acting_offset(state.player_count()));
        let prediction = self.predict(&key);
        Ok(LeafValue {
            value: prediction.value as f64 * MAX_SCORE as f64,
            moves: 0,
        })
    }
}

impl<N: PolicyValueNetwork + std::fmt::Debug> std::fmt::Debug for NetworkEvaluator<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkEvaluator")
            .field("network", &self.network)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluatorError;
    use crate::mcts::codec::ACTION_SPACE;
    use crate::nn::{EncodedState, UnavailableNetwork, UniformPolicyZeroValue};

    fn ctx() -> LeafContext {
        LeafContext { searcher: PlayerId::new(0), to_move: PlayerId::new(1) }
    }

    struct FixedValue(f32);

    impl PolicyValueNetwork for FixedValue {
        fn predict(&self, _encoded: &EncodedState) -> Result<Prediction, EvaluatorError> {
            Ok(Prediction { policy: vec![0.0; ACTION_SPACE], value: self.0 })
        }
    }

    #[test]
    fn test_rollout_respects_move_limit() {
        let mut state = GameState::new(2, 17).unwrap();
        let mut rng = GameRng::new(17);
        let leaf = RolloutEvaluator::new(6).evaluate(&mut state, &ctx(), &mut rng).unwrap();

        assert!(leaf.moves <= 6);
        assert_eq!(state.turn_number(), leaf.moves);
        assert_eq!(leaf.value, state.score() as f64);
    }

    #[test]
    fn test_rollout_stops_at_game_over() {
        let mut state = GameState::new(2, 3).unwrap();
        let mut rng = GameRng::new(3);
        let leaf = RolloutEvaluator::new(10_000).evaluate(&mut state, &ctx(), &mut rng).unwrap();

        assert!(state.is_game_over());
        assert!(leaf.value <= MAX_SCORE as f64);
    }

    #[test]
    fn test_network_value_is_denormalized() {
        let mut state = GameState::new(2, 3).unwrap();
        let mut rng = GameRng::new(3);
        let leaf = NetworkEvaluator::new(FixedValue(0.4)).evaluate(&mut state, &ctx(), &mut rng).unwrap();

        assert!((leaf.value - 10.0).abs() < 1e-5);
        assert_eq!(state.turn_number(), 0);
    }

    #[test]
    fn test_unavailable_network_degrades() {
        let mut state = GameState::new(2, 3).unwrap();
        let mut rng = GameRng::new(3);
        let evaluator = NetworkEvaluator::new(UnavailableNetwork::new("offline"));

        for _ in 0..3 {
            let leaf = evaluator.evaluate(&mut state, &ctx(), &mut rng).unwrap();
            assert_eq!(leaf.value, 0.0);
        }
    }

    #[test]
    fn test_uniform_network_prior() {
        let evaluator = NetworkEvaluator::new(UniformPolicyZeroValue);
        let key = StateKey::new(&GameState::new(3, 1).unwrap(), 2);
        let prediction = evaluator.predict(&key);
        assert_eq!(prediction.policy.len(), ACTION_SPACE);
        assert!((prediction.policy.iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }
}
