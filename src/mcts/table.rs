//! Per-state statistics for network-guided search.
//!
//! Statistics are keyed by [`StateKey`], so every path and every
//! determinization that reaches the same public state shares one entry.

use rustc_hash::FxHashMap;

use super::codec::{ActionId, ACTION_SPACE};
use super::stats::RunningMean;
use crate::nn::StateKey;

/// Visit counts, values and priors for every action id at one state.
#[derive(Clone, Debug)]
pub struct StateStats {
    values: [RunningMean; ACTION_SPACE],
    priors: [f32; ACTION_SPACE],
}

impl StateStats {
    /// Fresh entry with the given priors. Missing entries default to 0.
    #[must_use]
    pub fn new(priors: &[f32]) -> Self {
        let mut stored = [0.0f32; ACTION_SPACE];
        for (slot, &p) in stored.iter_mut().zip(priors) {
            *slot = p;
        }
        Self {
            values: [RunningMean::new(); ACTION_SPACE],
            priors: stored,
        }
    }

    #[inline]
    #[must_use]
    pub fn visits(&self, id: ActionId) -> u32 {
        self.values[id.index()].count()
    }

    /// Mean final score after taking `id`; zero if never taken.
    #[inline]
    #[must_use]
    pub fn q(&self, id: ActionId) -> f64 {
        self.values[id.index()].mean()
    }

    #[inline]
    #[must_use]
    pub fn prior(&self, id: ActionId) -> f32 {
        self.priors[id.index()]
    }

    /// Visits summed over every action.
    #[must_use]
    pub fn total_visits(&self) -> u32 {
        self.values.iter().map(RunningMean::count).sum()
    }

    /// Visit fraction per action id.
    #[must_use]
    pub fn visit_distribution(&self) -> Vec<f32> {
        let total = self.total_visits();
        if total == 0 {
            return vec![0.0; ACTION_SPACE];
        }
        self.values
            .iter()
            .map(|v| v.count() as f32 / total as f32)
            .collect()
    }

    pub fn record(&mut self, id: ActionId, value: f64) {
        self.values[id.index()].push(value);
    }
}

/// Transposition table for one decision.
#[derive(Clone, Debug, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<StateKey, StateStats>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &StateKey) -> Option<&StateStats> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &StateKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Add a state with its priors. An existing entry is kept as is.
    pub fn insert(&mut self, key: StateKey, priors: &[f32]) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, StateStats::new(priors));
        true
    }

    /// Record `value` for every (state, action) pair on `path`.
    pub fn backup(&mut self, path: &[(StateKey, ActionId)], value: f64) {
        for (key, id) in path {
            if let Some(stats) = self.entries.get_mut(key) {
                stats.record(*id, value);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &StateStats)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanabi::GameState;

    fn key(offset: usize) -> StateKey {
        StateKey::new(&GameState::new(2, 8).unwrap(), offset)
    }

    #[test]
    fn test_defaults_are_zero() {
        let stats = StateStats::new(&[]);
        assert_eq!(stats.visits(ActionId(7)), 0);
        assert_eq!(stats.q(ActionId(7)), 0.0);
        assert_eq!(stats.prior(ActionId(7)), 0.0);
        assert_eq!(stats.visit_distribution(), vec![0.0; ACTION_SPACE]);
    }

    #[test]
    fn test_insert_keeps_first_entry() {
        let mut table = TranspositionTable::new();
        assert!(table.insert(key(0), &[0.5; ACTION_SPACE]));
        assert!(!table.insert(key(0), &[0.1; ACTION_SPACE]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key(0)).unwrap().prior(ActionId(3)), 0.5);
    }

    #[test]
    fn test_transpositions_share_statistics() {
        let mut table = TranspositionTable::new();
        table.insert(key(0), &[]);
        table.insert(key(1), &[]);

        table.backup(&[(key(0), ActionId(5)), (key(1), ActionId(22))], 10.0);
        // A second path through an equal key lands on the same entry.
        table.backup(&[(key(0), ActionId(5))], 20.0);

        let root = table.get(&key(0)).unwrap();
        assert_eq!(root.visits(ActionId(5)), 2);
        assert_eq!(root.q(ActionId(5)), 15.0);
        assert_eq!(root.total_visits(), 2);
        assert_eq!(table.get(&key(1)).unwrap().visits(ActionId(22)), 1);
    }

    #[test]
    fn test_visit_distribution() {
        let mut stats = StateStats::new(&[]);
        stats.record(ActionId(0), 1.0);
        stats.record(ActionId(0), 1.0);
        stats.record(ActionId(9), 1.0);
        stats.record(ActionId(59), 1.0);

        let dist = stats.visit_distribution();
        assert_eq!(dist[0], 0.5);
        assert_eq!(dist[9], 0.25);
        assert_eq!(dist[59], 0.25);
        assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}
