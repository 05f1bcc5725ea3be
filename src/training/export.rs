//! Training examples harvested from finished searches.
//!
//! Each searched state becomes one example: its public key, the model
//! features for that key, and the visit fraction of every action id. The
//! buffer serialises to bincode for a training pipeline, or to delimited
//! text with one column per action id.

use std::collections::VecDeque;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::games::hanabi::Colour;
use crate::mcts::{MCTSSearch, ACTION_SPACE};
use crate::nn::{FeatureEncoder, PolicyValueNetwork, StateKey};

/// One (state, target policy) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub key: StateKey,

    /// Model input for `key`.
    pub features: Vec<f32>,

    /// Visit fraction per action id, length 60.
    pub policy: Vec<f32>,
}

impl TrainingExample {
    pub fn new(key: StateKey, policy: Vec<f32>) -> Self {
        let features = FeatureEncoder.encode(&key).tensor;
        Self {
            key,
            features,
            policy,
        }
    }

    /// Every searched state of the last decision made by `search`.
    pub fn from_search<N: PolicyValueNetwork>(search: &MCTSSearch<N>) -> Vec<Self> {
        search
            .visit_distribution()
            .into_iter()
            .map(|(key, policy)| Self::new(key, policy))
            .collect()
    }
}

/// Bounded FIFO of examples.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExampleBuffer {
    examples: VecDeque<TrainingExample>,
    max_examples: usize,
}

impl ExampleBuffer {
    pub fn new(max_examples: usize) -> Self {
        Self {
            examples: VecDeque::with_capacity(max_examples.min(4096)),
            max_examples,
        }
    }

    /// Add an example, evicting the oldest when full.
    pub fn push(&mut self, example: TrainingExample) {
        if self.max_examples == 0 {
            return;
        }
        if self.examples.len() >= self.max_examples {
            self.examples.pop_front();
        }
        self.examples.push_back(example);
    }

    pub fn extend(&mut self, examples: impl IntoIterator<Item = TrainingExample>) {
        for example in examples {
            self.push(example);
        }
    }

    /// Harvest the last decision of `search`. Returns how many were added.
    pub fn record_search<N: PolicyValueNetwork>(&mut self, search: &MCTSSearch<N>) -> usize {
        let examples = TrainingExample::from_search(search);
        let added = examples.len();
        self.extend(examples);
        added
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_examples
    }

    pub fn clear(&mut self) {
        self.examples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> {
        self.examples.iter()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Header line for [`ExampleBuffer::write_csv`].
    #[must_use]
    pub fn csv_header() -> String {
        let mut columns: Vec<String> = [
            "PlayerCount",
            "Information",
            "Lives",
            "CardColorRed",
            "CardColorBlue",
            "CardColorGreen",
            "CardColorOrange",
            "CardColorWhite",
            "NextAgentOffset",
            "Score",
            "Turn",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        for colour in Colour::ALL {
            for value in 1..=5 {
                columns.push(format!("Discard{colour:?}_{value}"));
            }
        }
        columns.extend((0..ACTION_SPACE).map(|i| format!("Action_{i}")));
        columns.join(",")
    }

    /// Write a header and one row per example.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        writeln!(writer, "{}", Self::csv_header())?;
        for example in &self.examples {
            let key = &example.key;
            let mut row: Vec<String> = vec![
                key.player_count.to_string(),
                key.information.to_string(),
                key.lives.to_string(),
            ];
            row.extend(key.table.iter().map(u8::to_string));
            row.push(key.acting_offset.to_string());
            row.push(key.score.to_string());
            row.push(key.turn.to_string());
            row.extend(key.discards.as_array().iter().map(u8::to_string));
            row.extend(example.policy.iter().map(f32::to_string));
            writeln!(writer, "{}", row.join(","))?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for ExampleBuffer {
    fn default() -> Self {
        Self::new(100_000)
    }
}
