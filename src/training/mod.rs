//! Offline export of search statistics for training a policy/value model.
//!
//! ```rust
//! use hanabi_mcts::core::PlayerId;
//! use hanabi_mcts::games::hanabi::GameState;
//! use hanabi_mcts::mcts::{MCTSConfig, MCTSSearch};
//! use hanabi_mcts::training::ExampleBuffer;
//!
//! let state = GameState::new(2, 3).unwrap();
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_max_iterations(50)).unwrap();
//! search.do_move(PlayerId::new(0), &state).unwrap();
//!
//! let mut buffer = ExampleBuffer::new(1_000);
//! buffer.record_search(&search);
//! let bytes = buffer.to_bytes().unwrap();
//! assert_eq!(ExampleBuffer::from_bytes(&bytes).unwrap().len(), buffer.len());
//! ```

pub mod export;

pub use export::{ExampleBuffer, TrainingExample};
