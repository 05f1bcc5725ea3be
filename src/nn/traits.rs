//! Interface to the external policy/value model.
//!
//! The model itself lives outside this crate. The search only needs one
//! forward pass per new state: a 60-wide policy over action ids and a scalar
//! value normalised to `[0, 1]` (fraction of the maximum score).

use serde::{Deserialize, Serialize};

use crate::error::EvaluatorError;
use crate::mcts::codec::ACTION_SPACE;

/// Feature vector handed to the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened features.
    pub tensor: Vec<f32>,

    /// Shape of the tensor (always `[features]` here).
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// One-dimensional state of the given features.
    pub fn flat(tensor: Vec<f32>) -> Self {
        let len = tensor.len();
        Self::new(tensor, vec![len])
    }

    pub fn zeros(len: usize) -> Self {
        Self::flat(vec![0.0; len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// One forward pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Prior per action id; length [`ACTION_SPACE`].
    pub policy: Vec<f32>,

    /// Expected final score divided by the maximum score.
    pub value: f32,
}

impl Prediction {
    /// All-zero policy and zero value.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            policy: vec![0.0; ACTION_SPACE],
            value: 0.0,
        }
    }

    /// Reject predictions whose policy does not span the action space.
    pub fn validate(self) -> Result<Self, EvaluatorError> {
        if self.policy.len() != ACTION_SPACE {
            return Err(EvaluatorError::PolicyLength {
                expected: ACTION_SPACE,
                got: self.policy.len(),
            });
        }
        Ok(self)
    }
}

/// Combined policy and value model.
pub trait PolicyValueNetwork: Send + Sync {
    fn predict(&self, encoded: &EncodedState) -> Result<Prediction, EvaluatorError>;
}

/// Uniform prior and zero value; a baseline for tests and benchmarks.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPolicyZeroValue;

impl PolicyValueNetwork for UniformPolicyZeroValue {
    fn predict(&self, _encoded: &EncodedState) -> Result<Prediction, EvaluatorError> {
        Ok(Prediction {
            policy: vec![1.0 / ACTION_SPACE as f32; ACTION_SPACE],
            value: 0.0,
        })
    }
}

/// A model that is never reachable.
#[derive(Clone, Debug)]
pub struct UnavailableNetwork {
    reason: String,
}

impl UnavailableNetwork {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PolicyValueNetwork for UnavailableNetwork {
    fn predict(&self, _encoded: &EncodedState) -> Result<Prediction, EvaluatorError> {
        Err(EvaluatorError::Unavailable(self.reason.clone()))
    }
}
