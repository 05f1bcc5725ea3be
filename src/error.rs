//! Error types.
//!
//! Each concern has its own enum; [`SearchError`] aggregates the ones a
//! caller of [`MCTSSearch::do_move`](crate::mcts::MCTSSearch::do_move) can
//! observe. Determinization and evaluator failures are recovered inside
//! the search loop and only surface through statistics and logs.

use thiserror::Error;

use crate::core::PlayerId;
use crate::games::hanabi::Action;

/// Rules violations raised by the game collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// An action failed its legality check at apply time.
    #[error("illegal action for {player}: {action}")]
    IllegalAction { player: PlayerId, action: Action },
}

/// Failures mapping between actions and action ids.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("action id {0} is outside the action space")]
    OutOfRange(u8),

    #[error("action id {id} encodes offset {offset}, not a valid target among {player_count} players")]
    InvalidOffset { id: u8, offset: usize, player_count: usize },

    #[error("{action} cannot be encoded for {actor}")]
    Unencodable { action: Action, actor: PlayerId },
}

/// Failures binding hidden cards to the agent's hand.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeterminizationError {
    /// No card instance is left for this slot once earlier slots were bound.
    #[error("no candidate card left for hand slot {slot}")]
    EmptyCandidates { slot: usize },

    /// Every retry hit an empty candidate set.
    #[error("determinization failed after {attempts} attempts")]
    AttemptsExhausted { attempts: usize },
}

/// Failures of the external policy/value evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    /// The model is not loaded or cannot be reached.
    #[error("evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("evaluator returned a policy of length {got}, expected {expected}")]
    PolicyLength { expected: usize, got: usize },
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported player count {0} (expected 2-5)")]
    PlayerCount(usize),

    #[error("invalid search config: {0}")]
    Invalid(&'static str),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the search controller.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("{0} has no legal action")]
    NoLegalActions(PlayerId),
}

/// Failures writing or reading exported training examples.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("encoding examples: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("writing examples: {0}")]
    Io(#[from] std::io::Error),
}
