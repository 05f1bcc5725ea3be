//! Search tree nodes.
//!
//! Nodes live in an arena ([`MCTSTree`](super::tree::MCTSTree)) and refer
//! to each other by [`NodeId`]. A node stands for the position reached
//! after `agent` played `action`; the seat to move there is the next one.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stats::{RunningMean, RunningStats};
use crate::core::PlayerId;
use crate::games::hanabi::Action;
use crate::nn::StateKey;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the search tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Seat that played `action`. At the root this is the seat before the
    /// searching agent, so the root's children are the agent's own moves.
    pub agent: PlayerId,

    /// Move that led here (none at the root).
    pub action: Option<Action>,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Visit count and mean final score of iterations through this node.
    pub value: RunningMean,

    /// Children in creation order.
    pub children: SmallVec<[NodeId; 8]>,

    /// Moves played by rollouts started below this node.
    pub rollout_moves: RunningStats,

    /// Scores reached by those rollouts.
    pub rollout_scores: RunningStats,

    /// Public key of the state where the node was created.
    pub key: StateKey,
}

impl MCTSNode {
    pub fn new(
        parent: NodeId,
        agent: PlayerId,
        action: Option<Action>,
        depth: u16,
        key: StateKey,
    ) -> Self {
        Self {
            parent,
            agent,
            action,
            depth,
            value: RunningMean::new(),
            children: SmallVec::new(),
            rollout_moves: RunningStats::new(),
            rollout_scores: RunningStats::new(),
            key,
        }
    }

    /// Root node; `agent` is the seat that moved last.
    pub fn root(agent: PlayerId, key: StateKey) -> Self {
        Self::new(NodeId::NONE, agent, None, 0, key)
    }

    #[inline]
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.value.count()
    }

    /// Mean final score of iterations through this node.
    #[inline]
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        self.value.mean()
    }

    /// Seat to move at this node.
    #[must_use]
    pub fn to_move(&self, player_count: usize) -> PlayerId {
        self.agent.next(player_count)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Fold one iteration's value into this node.
    pub fn record(&mut self, value: f64) {
        self.value.push(value);
    }

    /// Fold one rollout's diagnostics into this node.
    pub fn record_rollout(&mut self, moves: u32, score: f64) {
        self.rollout_moves.push(moves as f64);
        self.rollout_scores.push(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanabi::GameState;

    fn key() -> StateKey {
        StateKey::new(&GameState::new(2, 1).unwrap(), 0)
    }

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_node_root() {
        let node = MCTSNode::root(PlayerId::new(1), key());

        assert!(node.is_root());
        assert_eq!(node.depth, 0);
        assert_eq!(node.action, None);
        assert_eq!(node.visits(), 0);
        assert_eq!(node.to_move(2), PlayerId::new(0));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_record() {
        let mut node = MCTSNode::new(NodeId::new(0), PlayerId::new(0), Some(Action::Play { slot: 0 }), 1, key());
        node.record(10.0);
        node.record(20.0);
        node.record_rollout(4, 10.0);

        assert_eq!(node.visits(), 2);
        assert_eq!(node.mean_value(), 15.0);
        assert_eq!(node.rollout_moves.count(), 1);
        assert_eq!(node.rollout_scores.max(), Some(10.0));
    }

    #[test]
    fn test_serialization() {
        let mut node = MCTSNode::root(PlayerId::new(1), key());
        node.children.push(NodeId::new(3));
        node.record(5.0);

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: MCTSNode = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.agent, PlayerId::new(1));
        assert_eq!(deserialized.visits(), 1);
        assert_eq!(deserialized.children.len(), 1);
    }
}
