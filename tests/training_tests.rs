//! Integration tests for feature encoding and training export.

use hanabi_mcts::core::PlayerId;
use hanabi_mcts::games::hanabi::GameState;
use hanabi_mcts::mcts::{MCTSConfig, MCTSSearch, SearchMode, ACTION_SPACE};
use hanabi_mcts::nn::{FeatureEncoder, PolicyValueNetwork, StateKey, UniformPolicyZeroValue};
use hanabi_mcts::training::{ExampleBuffer, TrainingExample};

fn searched(mode: SearchMode, player_count: usize) -> MCTSSearch {
    let state = GameState::new(player_count, 31).unwrap();
    let config = MCTSConfig::default()
        .with_mode(mode)
        .with_max_iterations(120)
        .with_time_budget_ms(60_000);
    let mut search = MCTSSearch::new(config).unwrap();
    search.do_move(PlayerId::new(0), &state).unwrap();
    search
}

// =============================================================================
// Encoder Tests
// =============================================================================

#[test]
fn test_feature_count_grows_with_table() {
    for player_count in 2..=5 {
        let state = GameState::new(player_count, 1).unwrap();
        let encoded = FeatureEncoder.encode_state(&state, 1);
        assert_eq!(encoded.len(), FeatureEncoder::feature_count(player_count));
        assert_eq!(encoded.len(), 13 + player_count - 1);
    }
}

#[test]
fn test_fresh_game_features() {
    let state = GameState::new(3, 1).unwrap();
    let encoded = FeatureEncoder.encode_state(&state, 0);

    assert!((encoded.tensor[0] - 3.0 / 5.0).abs() < 1e-6);
    assert_eq!(encoded.tensor[1], 1.0);
    assert_eq!(encoded.tensor[2], 1.0);
    // Nothing played and the searcher to move.
    assert!(encoded.tensor[3..].iter().all(|&f| f == 0.0));
}

#[test]
fn test_encoder_feeds_default_network() {
    let state = GameState::new(2, 1).unwrap();
    let prediction = UniformPolicyZeroValue
        .predict(&FeatureEncoder.encode_state(&state, 1))
        .unwrap();
    assert_eq!(prediction.policy.len(), ACTION_SPACE);
    assert_eq!(prediction.value, 0.0);
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_examples_from_rollout_search() {
    let search = searched(SearchMode::Rollout, 2);
    let examples = TrainingExample::from_search(&search);

    assert!(!examples.is_empty());
    let root = StateKey::new(&GameState::new(2, 31).unwrap().observed_by(PlayerId::new(0)), 0);
    assert!(examples.iter().any(|e| e.key == root));
    for example in &examples {
        assert_eq!(example.policy.len(), ACTION_SPACE);
        assert_eq!(example.features.len(), FeatureEncoder::feature_count(2));
        assert!((example.policy.iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_buffer_collects_guided_search() {
    let search = searched(SearchMode::Guided, 4);
    let mut buffer = ExampleBuffer::new(1_000);

    let added = buffer.record_search(&search);
    assert!(added > 0);
    assert_eq!(buffer.len(), added);

    let restored = ExampleBuffer::from_bytes(&buffer.to_bytes().unwrap()).unwrap();
    assert_eq!(restored.len(), buffer.len());
}

#[test]
fn test_csv_has_one_row_per_example() {
    let search = searched(SearchMode::Rollout, 3);
    let mut buffer = ExampleBuffer::default();
    buffer.record_search(&search);

    let mut out = Vec::new();
    buffer.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().count(), buffer.len() + 1);
    let columns = text.lines().next().unwrap().split(',').count();
    // 11 scalar columns, 25 discard counts, 60 action columns.
    assert_eq!(columns, 11 + 25 + ACTION_SPACE);
}
