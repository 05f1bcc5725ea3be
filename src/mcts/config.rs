//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How leaves are valued and statistics are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// UCT over an arena tree, leaves valued by random rollouts.
    #[default]
    Rollout,
    /// PUCT over a transposition table, leaves valued by a network.
    Guided,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// Exploration constant shared by UCT and PUCT (default: sqrt(2)).
    pub exploration_constant: f64,

    /// Moves simulated by one rollout before it is cut off.
    pub rollout_depth: u32,

    /// Tree depth limit is `player_count * tree_depth_multiplier + 1`.
    pub tree_depth_multiplier: u32,

    /// Wall-clock budget per decision, checked once per iteration.
    pub time_budget_ms: u64,

    /// Optional cap on iterations; whichever limit is hit first stops the
    /// search.
    pub max_iterations: Option<u32>,

    /// Binding attempts per iteration before the iteration is skipped.
    pub max_determinization_attempts: usize,

    /// Random seed. Same seed and iteration cap give the same search.
    pub seed: u64,

    pub mode: SearchMode,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            rollout_depth: 18,
            tree_depth_multiplier: 1,
            time_budget_ms: 1000,
            max_iterations: None,
            max_determinization_attempts: 16,
            seed: 42,
            mode: SearchMode::Rollout,
        }
    }
}

impl MCTSConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ConfigError::Invalid("exploration_constant must be finite and non-negative"));
        }
        if self.rollout_depth == 0 {
            return Err(ConfigError::Invalid("rollout_depth must be positive"));
        }
        if self.tree_depth_multiplier == 0 {
            return Err(ConfigError::Invalid("tree_depth_multiplier must be positive"));
        }
        if self.max_determinization_attempts == 0 {
            return Err(ConfigError::Invalid("max_determinization_attempts must be positive"));
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::Invalid("max_iterations must be positive when set"));
        }
        Ok(())
    }

    /// Deepest tree node for a table of `player_count`.
    #[must_use]
    pub fn depth_limit(&self, player_count: usize) -> u16 {
        (player_count as u32 * self.tree_depth_multiplier + 1).min(u16::MAX as u32) as u16
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    pub fn with_tree_depth_multiplier(mut self, multiplier: u32) -> Self {
        self.tree_depth_multiplier = multiplier;
        self
    }

    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = ms;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_determinization_attempts(mut self, attempts: usize) -> Self {
        self.max_determinization_attempts = attempts;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.rollout_depth, 18);
        assert_eq!(config.time_budget_ms, 1000);
        assert_eq!(config.max_determinization_attempts, 16);
        assert_eq!(config.mode, SearchMode::Rollout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let config = MCTSConfig::default();
        assert_eq!(config.depth_limit(2), 3);
        assert_eq!(config.with_tree_depth_multiplier(3).depth_limit(4), 13);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_max_iterations(500)
            .with_mode(SearchMode::Guided);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_iterations, Some(500));
        assert_eq!(config.mode, SearchMode::Guided);
    }

    #[test]
    fn test_json_round_trip() {
        let config = MCTSConfig::default().with_time_budget_ms(200).with_mode(SearchMode::Guided);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"guided\""));
        assert_eq!(MCTSConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MCTSConfig::from_json(r#"{ "rollout_depth": 30 }"#).unwrap();
        assert_eq!(config.rollout_depth, 30);
        assert_eq!(config.time_budget_ms, 1000);
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            MCTSConfig::from_json(r#"{ "tree_depth_multiplier": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MCTSConfig::default().with_rollout_depth(0).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(MCTSConfig::from_json("{ not json"), Err(ConfigError::Json(_))));
    }
}
