//! Arena-based search tree for rollout mode.
//!
//! Nodes are stored in a flat vector and referenced by [`NodeId`]. The tree
//! is rebuilt for every decision; nothing outlives one `do_move` call.

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::PlayerId;
use crate::games::hanabi::Action;
use crate::nn::StateKey;

/// Arena-based MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
    player_count: usize,
}

impl MCTSTree {
    /// Tree holding only a root; `root_agent` is the seat that moved last.
    pub fn new(root_agent: PlayerId, player_count: usize, key: StateKey) -> Self {
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(MCTSNode::root(root_agent, key));
        Self {
            nodes,
            root: NodeId::new(0),
            player_count,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Create the child of `parent` reached when `agent` plays `action`.
    pub fn add_child(&mut self, parent: NodeId, agent: PlayerId, action: Action, key: StateKey) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes
            .push(MCTSNode::new(parent, agent, Some(action), depth, key));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Existing child of `parent` for `action`.
    #[must_use]
    pub fn child_for(&self, parent: NodeId, action: &Action) -> Option<NodeId> {
        self.get(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).action.as_ref() == Some(action))
    }

    /// Actions in `legal` that `node` has no child for, in the given order.
    #[must_use]
    pub fn untried(&self, node: NodeId, legal: &[Action]) -> Vec<Action> {
        legal
            .iter()
            .filter(|action| self.child_for(node, action).is_none())
            .copied()
            .collect()
    }

    /// Children of `node` whose action is in `legal`, in creation order.
    #[must_use]
    pub fn legal_children(&self, node: NodeId, legal: &[Action]) -> Vec<NodeId> {
        self.get(node)
            .children
            .iter()
            .copied()
            .filter(|&child| {
                self.get(child)
                    .action
                    .as_ref()
                    .is_some_and(|action| legal.contains(action))
            })
            .collect()
    }

    /// Record `value` on `leaf` and each of its ancestors.
    pub fn backup(&mut self, leaf: NodeId, value: f64) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.record(value);
            current = node.parent;
        }
    }

    /// Record one rollout on `leaf` and each of its ancestors.
    pub fn backup_rollout(&mut self, leaf: NodeId, moves: u32, score: f64) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.record_rollout(moves, score);
            current = node.parent;
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            leaf_count,
            root_children: self.root_node().children.len(),
        }
    }
}

/// Shape of a search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub leaf_count: usize,
    pub root_children: usize,
}

impl TreeStats {
    /// Average children per interior node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let interior = self.node_count - self.leaf_count;
        if interior == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / interior as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::hanabi::GameState;

    fn tree() -> MCTSTree {
        let state = GameState::new(2, 4).unwrap();
        MCTSTree::new(PlayerId::new(1), 2, StateKey::new(&state, 0))
    }

    #[test]
    fn test_tree_new() {
        let tree = tree();
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.player_count(), 2);
        assert_eq!(tree.root(), NodeId::new(0));
        assert_eq!(tree.root_node().to_move(2), PlayerId::new(0));
    }

    #[test]
    fn test_add_child_and_lookup() {
        let mut tree = tree();
        let root = tree.root();
        let key = tree.root_node().key.clone();
        let play = Action::Play { slot: 2 };
        let child = tree.add_child(root, PlayerId::new(0), play, key);

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).parent, root);
        assert_eq!(tree.child_for(root, &play), Some(child));
        assert_eq!(tree.child_for(root, &Action::Play { slot: 0 }), None);
    }

    #[test]
    fn test_expansion_against_legal_set() {
        let mut tree = tree();
        let root = tree.root();
        let key = tree.root_node().key.clone();
        let legal = [Action::Play { slot: 0 }, Action::Play { slot: 1 }, Action::Play { slot: 2 }];

        tree.add_child(root, PlayerId::new(0), legal[1], key.clone());
        assert_eq!(tree.untried(root, &legal), vec![legal[0], legal[2]]);

        tree.add_child(root, PlayerId::new(0), legal[0], key.clone());
        tree.add_child(root, PlayerId::new(0), legal[2], key);
        assert!(tree.untried(root, &legal).is_empty());
        // Creation order, restricted to what is legal now.
        assert_eq!(
            tree.legal_children(root, &legal[..2]),
            vec![NodeId::new(1), NodeId::new(2)]
        );
    }

    #[test]
    fn test_backup_updates_path() {
        let mut tree = tree();
        let root = tree.root();
        let key = tree.root_node().key.clone();
        let a = tree.add_child(root, PlayerId::new(0), Action::Play { slot: 0 }, key.clone());
        let b = tree.add_child(a, PlayerId::new(1), Action::Play { slot: 1 }, key);

        tree.backup(b, 6.0);
        tree.backup(a, 2.0);
        tree.backup_rollout(b, 9, 6.0);

        assert_eq!(tree.get(root).visits(), 2);
        assert_eq!(tree.get(a).mean_value(), 4.0);
        assert_eq!(tree.get(b).visits(), 1);
        assert_eq!(tree.get(root).rollout_moves.count(), 1);

        let stats = tree.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.branching_factor(), 1.0);
    }

    #[test]
    fn test_tree_serialization() {
        let mut tree = tree();
        tree.backup(tree.root(), 3.0);

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: MCTSTree = serde_json::from_str(&json).unwrap();

        assert_eq!(tree.len(), deserialized.len());
        assert_eq!(deserialized.root_node().visits(), 1);
    }
}
