//! Learned evaluator integration.
//!
//! - **Traits**: [`PolicyValueNetwork`] is the seam to the external model.
//! - **Encoding**: [`StateKey`] summarises a state, [`FeatureEncoder`]
//!   turns a key into the model's input vector.
//! - **Baselines**: [`UniformPolicyZeroValue`], [`UnavailableNetwork`].
//!
//! ```rust
//! use hanabi_mcts::games::hanabi::GameState;
//! use hanabi_mcts::nn::{FeatureEncoder, PolicyValueNetwork, UniformPolicyZeroValue};
//!
//! let state = GameState::new(2, 7).unwrap();
//! let encoded = FeatureEncoder.encode_state(&state, 0);
//! let prediction = UniformPolicyZeroValue.predict(&encoded).unwrap();
//! assert_eq!(prediction.policy.len(), 60);
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{FeatureEncoder, StateKey};
pub use traits::{
    EncodedState, PolicyValueNetwork, Prediction, UnavailableNetwork, UniformPolicyZeroValue,
};
