//! # hanabi-mcts
//!
//! A determinized Monte Carlo Tree Search decision engine for Hanabi, the
//! cooperative card game in which every player sees every hand but their
//! own.
//!
//! ## Design Principles
//!
//! 1. **Sample, then search**: each iteration deals the searching agent's
//!    hidden cards consistently with the hints it has received, then
//!    searches that full-information copy.
//!
//! 2. **Seat-relative actions**: moves map to ids in `[0, 60)` relative to
//!    the acting seat, so one learned evaluator serves every seat.
//!
//! 3. **Cheap copies**: deck and discard pile are persistent `im` vectors;
//!    every iteration clones the state freely.
//!
//! ## Modules
//!
//! - `core`: players, RNG, rules configuration
//! - `games`: the Hanabi rules collaborator (cards, hands, state, actions)
//! - `rules`: action enumeration in action-id order
//! - `mcts`: determinization, codec, tree/table bookkeeping, search
//! - `nn`: state keys, feature encoding, the external model seam
//! - `training`: export of visit distributions
//! - `error`: error types

pub mod core;
pub mod error;
pub mod games;
pub mod mcts;
pub mod nn;
pub mod rules;
pub mod training;

pub use crate::core::{GameConfig, GameRng, PlayerId, PlayerMap};

pub use crate::error::{
    CodecError, ConfigError, DeterminizationError, EvaluatorError, ExportError, GameError,
    SearchError,
};

pub use crate::games::hanabi::{Action, Card, Colour, GameState, Hand};

pub use crate::rules::{all_actions, legal_actions};

pub use crate::mcts::{
    ActionCodec, ActionId, Determinizer, MCTSConfig, MCTSSearch, SearchMode, SearchStats,
    ACTION_SPACE,
};

pub use crate::nn::{FeatureEncoder, PolicyValueNetwork, Prediction, StateKey};

pub use crate::training::{ExampleBuffer, TrainingExample};
