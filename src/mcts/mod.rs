//! Determinized Monte Carlo Tree Search for Hanabi.
//!
//! ## Overview
//!
//! The searching agent cannot see its own cards. Each iteration therefore
//! starts by sampling them (see [`determinize`]) and then searches the
//! resulting full-information game:
//!
//! - **Rollout mode**: UCT over an arena tree, random rollouts at leaves
//! - **Guided mode**: PUCT over a transposition table, network at leaves
//! - **Time budget**: iterations run until a wall-clock deadline
//! - **Seat-relative actions**: ids in `[0, 60)` via [`ActionCodec`]
//!
//! ## Usage
//!
//! ```rust
//! use hanabi_mcts::core::PlayerId;
//! use hanabi_mcts::games::hanabi::GameState;
//! use hanabi_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let state = GameState::new(2, 7).unwrap();
//! let config = MCTSConfig::default().with_max_iterations(100);
//! let mut search = MCTSSearch::new(config).unwrap();
//!
//! let action = search.do_move(PlayerId::new(0), &state).unwrap();
//! assert!(action.is_legal(PlayerId::new(0), &state));
//! ```

pub mod codec;
pub mod config;
pub mod determinize;
pub mod evaluator;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod table;
pub mod tree;

pub use codec::{ActionCodec, ActionId, ACTION_SPACE};
pub use config::{MCTSConfig, SearchMode};
pub use determinize::{Binding, Determinizer, SlotCandidates};
pub use evaluator::{LeafContext, LeafEvaluator, LeafValue, NetworkEvaluator, RolloutEvaluator};
pub use node::{MCTSNode, NodeId};
pub use policy::{ChildStats, Puct, SelectionPolicy, Uct};
pub use search::MCTSSearch;
pub use stats::{RunningMean, RunningStats, SearchStats};
pub use table::{StateStats, TranspositionTable};
pub use tree::{MCTSTree, TreeStats};
