//! Determinized MCTS decision loop.
//!
//! Every iteration samples the searching agent's hidden cards, then runs
//! one select/expand/evaluate/backup cycle on that full-information copy:
//!
//! - **Rollout mode** keeps an arena tree, selects with UCT among children
//!   whose move is legal in the current sample, and values the new leaf by
//!   a random rollout.
//! - **Guided mode** keys statistics by public state so determinizations and
//!   transpositions share them, selects with PUCT over every legal move, and
//!   values a newly seen state with one network call.
//!
//! The deadline is checked between iterations; an iteration in flight
//! always completes, and statistics are only touched once it has.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::core::{GameRng, PlayerId};
use crate::error::SearchError;
use crate::games::hanabi::{Action, GameState, MAX_SCORE};
use crate::nn::{PolicyValueNetwork, StateKey, UniformPolicyZeroValue};
use crate::rules::legal_actions;

use super::codec::{ActionCodec, ActionId, ACTION_SPACE};
use super::config::{MCTSConfig, SearchMode};
use super::determinize::Determinizer;
use super::evaluator::{LeafContext, LeafEvaluator, NetworkEvaluator, RolloutEvaluator};
use super::policy::{ChildStats, Puct, SelectionPolicy, Uct};
use super::stats::SearchStats;
use super::table::TranspositionTable;
use super::tree::MCTSTree;

/// The decision being searched.
#[derive(Clone, Debug)]
struct Root {
    agent: PlayerId,
    player_count: usize,
    key: StateKey,
}

/// Main MCTS search context.
///
/// Owns the configuration, the RNG and the evaluators. Tree and table are
/// rebuilt by every [`MCTSSearch::do_move`] and kept afterwards only for
/// inspection.
pub struct MCTSSearch<N: PolicyValueNetwork = UniformPolicyZeroValue> {
    config: MCTSConfig,
    rng: GameRng,
    /// Separate stream for leaf evaluation.
    rollout_rng: GameRng,
    determinizer: Determinizer,
    rollout: RolloutEvaluator,
    network: NetworkEvaluator<N>,
    uct: Uct,
    puct: Puct,
    tree: Option<MCTSTree>,
    table: TranspositionTable,
    root: Option<Root>,
    stats: SearchStats,
}

impl MCTSSearch<UniformPolicyZeroValue> {
    /// Search without a trained model. Guided mode then sees a uniform
    /// prior and a zero value.
    pub fn new(config: MCTSConfig) -> Result<Self, SearchError> {
        Self::with_network(config, UniformPolicyZeroValue)
    }
}

impl<N: PolicyValueNetwork> MCTSSearch<N> {
    /// Search backed by `network` in guided mode.
    pub fn with_network(config: MCTSConfig, network: N) -> Result<Self, SearchError> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed);
        Ok(Self {
            rollout_rng: rng.fork(),
            rng,
            determinizer: Determinizer::new(config.max_determinization_attempts),
            rollout: RolloutEvaluator::new(config.rollout_depth),
            network: NetworkEvaluator::new(network),
            uct: Uct::new(config.exploration_constant),
            puct: Puct::new(config.exploration_constant),
            tree: None,
            table: TranspositionTable::new(),
            root: None,
            stats: SearchStats::default(),
            config,
        })
    }

    /// Choose a move for `agent`.
    ///
    /// `state` may be the full game state or the agent's observed view; the
    /// agent's own cards are hidden before searching either way.
    pub fn do_move(&mut self, agent: PlayerId, state: &GameState) -> Result<Action, SearchError> {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(self.config.time_budget_ms);
        self.stats.reset();

        let player_count = state.player_count();
        if agent.index() >= player_count {
            return Err(SearchError::NoLegalActions(agent));
        }
        let view = state.observed_by(agent);
        let legal = legal_actions(&view, agent);
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions(agent));
        }

        let root_key = StateKey::new(&view, 0);
        self.table.clear();
        self.tree = (self.config.mode == SearchMode::Rollout).then(|| {
            MCTSTree::new(agent.previous(player_count), player_count, root_key.clone())
        });
        self.root = Some(Root {
            agent,
            player_count,
            key: root_key,
        });

        loop {
            let attempted = self.stats.iterations + self.stats.failed_determinizations;
            if self.config.max_iterations.is_some_and(|max| attempted >= max) {
                break;
            }
            if Instant::now() >= deadline {
                break;
            }

            let sampled = match self.determinizer.sample(&view, agent, &mut self.rng) {
                Ok(sampled) => sampled,
                Err(err) => {
                    self.stats.failed_determinizations += 1;
                    trace!(%agent, error = %err, "skipping iteration");
                    continue;
                }
            };
            match self.config.mode {
                SearchMode::Rollout => self.rollout_iteration(sampled, agent)?,
                SearchMode::Guided => self.guided_iteration(sampled, agent)?,
            }
            self.stats.iterations += 1;
        }
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let chosen = match self.best_action(agent, &legal)? {
            Some(action) => action,
            None => {
                debug!(%agent, "no root statistics, falling back to first legal action");
                legal[0]
            }
        };
        self.log_decision(agent, &chosen);
        Ok(chosen)
    }

    /// One UCT iteration on a determinized state.
    fn rollout_iteration(&mut self, mut state: GameState, agent: PlayerId) -> Result<(), SearchError> {
        let player_count = state.player_count();
        let depth_limit = self.config.depth_limit(player_count);
        let Some(tree) = self.tree.as_mut() else {
            return Ok(());
        };

        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            if state.is_game_over() || node.depth >= depth_limit {
                break;
            }
            let mover = node.to_move(player_count);
            let legal = legal_actions(&state, mover);
            if legal.is_empty() {
                break;
            }

            // Expansion: one new child per iteration.
            let untried = tree.untried(current, &legal);
            if let Some(&action) = self.rng.choose(&untried) {
                action.apply(mover, &mut state)?;
                let offset = agent.offset_to(mover.next(player_count), player_count);
                current = tree.add_child(current, mover, action, StateKey::new(&state, offset));
                self.stats.nodes_expanded += 1;
                break;
            }

            let children = tree.legal_children(current, &legal);
            let scored: Vec<ChildStats> = children
                .iter()
                .map(|&child| {
                    let n = tree.get(child);
                    ChildStats {
                        visits: n.visits(),
                        mean: n.mean_value(),
                        prior: 0.0,
                    }
                })
                .collect();
            let Some(pick) = self.uct.select(&scored, tree.get(current).visits()) else {
                break;
            };
            let child = children[pick];
            if let Some(action) = tree.get(child).action {
                action.apply(mover, &mut state)?;
            }
            current = child;
        }

        let leaf = tree.get(current);
        self.stats.max_depth = self.stats.max_depth.max(leaf.depth);
        let ctx = LeafContext {
            searcher: agent,
            to_move: leaf.to_move(player_count),
        };
        let value = self.rollout.evaluate(&mut state, &ctx, &mut self.rollout_rng)?;
        tree.backup(current, value.value);
        tree.backup_rollout(current, value.moves, value.value);
        Ok(())
    }

    /// One PUCT iteration on a determinized state.
    fn guided_iteration(&mut self, mut state: GameState, agent: PlayerId) -> Result<(), SearchError> {
        let player_count = state.player_count();
        let depth_limit = self.config.depth_limit(player_count);
        let codec = ActionCodec::new(player_count);

        let mut path: Vec<(StateKey, ActionId)> = Vec::new();
        let mut mover = agent;
        let mut depth: u16 = 0;

        let value = loop {
            if state.is_game_over() {
                break state.score() as f64;
            }
            if depth >= depth_limit {
                let ctx = LeafContext {
                    searcher: agent,
                    to_move: mover,
                };
                self.stats.network_evaluations += 1;
                break self.network.evaluate(&mut state, &ctx, &mut self.rollout_rng)?.value;
            }

            let key = StateKey::new(&state, agent.offset_to(mover, player_count));
            let Some(entry) = self.table.get(&key) else {
                let prediction = self.network.predict(&key);
                self.stats.network_evaluations += 1;
                self.stats.nodes_expanded += 1;
                self.table.insert(key, &prediction.policy);
                break prediction.value as f64 * MAX_SCORE as f64;
            };

            let legal = legal_actions(&state, mover);
            if legal.is_empty() {
                break state.score() as f64;
            }
            let ids = legal
                .iter()
                .map(|action| codec.encode(action, mover))
                .collect::<Result<Vec<_>, _>>()?;
            let scored: Vec<ChildStats> = ids
                .iter()
                .map(|&id| ChildStats {
                    visits: entry.visits(id),
                    mean: entry.q(id),
                    prior: entry.prior(id),
                })
                .collect();
            let Some(pick) = self.puct.select(&scored, entry.total_visits()) else {
                break state.score() as f64;
            };

            legal[pick].apply(mover, &mut state)?;
            path.push((key, ids[pick]));
            mover = mover.next(player_count);
            depth += 1;
        };

        self.stats.max_depth = self.stats.max_depth.max(depth);
        self.table.backup(&path, value);
        Ok(())
    }

    /// Most visited root move (rollout mode) or highest-valued visited root
    /// move (guided mode); ties go to the lowest action id.
    fn best_action(&self, agent: PlayerId, legal: &[Action]) -> Result<Option<Action>, SearchError> {
        let Some(root) = self.root.as_ref() else {
            return Ok(None);
        };
        let codec = ActionCodec::new(root.player_count);

        match self.config.mode {
            SearchMode::Rollout => {
                let Some(tree) = self.tree.as_ref() else {
                    return Ok(None);
                };
                let mut best: Option<(u32, ActionId, Action)> = None;
                for &child in &tree.root_node().children {
                    let node = tree.get(child);
                    let Some(action) = node.action else { continue };
                    if node.visits() == 0 {
                        continue;
                    }
                    let id = codec.encode(&action, agent)?;
                    let better = match best {
                        None => true,
                        Some((visits, best_id, _)) => {
                            node.visits() > visits || (node.visits() == visits && id < best_id)
                        }
                    };
                    if better {
                        best = Some((node.visits(), id, action));
                    }
                }
                Ok(best.map(|(_, _, action)| action))
            }
            SearchMode::Guided => {
                let Some(entry) = self.table.get(&root.key) else {
                    return Ok(None);
                };
                let mut best: Option<(f64, Action)> = None;
                for action in legal {
                    let id = codec.encode(action, agent)?;
                    if entry.visits(id) == 0 {
                        continue;
                    }
                    let q = entry.q(id);
                    if best.map_or(true, |(top, _)| q > top) {
                        best = Some((q, *action));
                    }
                }
                Ok(best.map(|(_, action)| action))
            }
        }
    }

    fn log_decision(&self, agent: PlayerId, chosen: &Action) {
        if let Some(tree) = self.tree.as_ref().filter(|_| self.config.mode == SearchMode::Rollout) {
            for &child in &tree.root_node().children {
                let node = tree.get(child);
                if let Some(action) = node.action {
                    debug!(
                        %action,
                        visits = node.visits(),
                        mean = node.mean_value(),
                        moves = %node.rollout_moves,
                        scores = %node.rollout_scores,
                        "root child rollouts"
                    );
                }
            }
            let shape = tree.stats();
            debug!(
                nodes = shape.node_count,
                depth = shape.max_depth,
                branching = shape.branching_factor(),
                "tree shape"
            );
        }
        debug!(
            %agent,
            action = %chosen,
            iterations = self.stats.iterations,
            failed = self.stats.failed_determinizations,
            "move chosen"
        );
    }

    /// Visit counts of the agent's moves at the root of the last decision.
    pub fn action_visits(&self) -> Vec<(Action, u32)> {
        let Some(root) = self.root.as_ref() else {
            return Vec::new();
        };
        match self.config.mode {
            SearchMode::Rollout => self
                .tree
                .as_ref()
                .map(|tree| {
                    tree.root_node()
                        .children
                        .iter()
                        .filter_map(|&c| {
                            let node = tree.get(c);
                            node.action.map(|a| (a, node.visits()))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            SearchMode::Guided => {
                let codec = ActionCodec::new(root.player_count);
                let Some(entry) = self.table.get(&root.key) else {
                    return Vec::new();
                };
                (0..ACTION_SPACE as u8)
                    .map(ActionId)
                    .filter(|&id| entry.visits(id) > 0)
                    .filter_map(|id| {
                        codec
                            .decode(id, root.agent)
                            .ok()
                            .map(|action| (action, entry.visits(id)))
                    })
                    .collect()
            }
        }
    }

    /// Every searched state of the last decision with the visit fraction of
    /// each action id taken from it.
    pub fn visit_distribution(&self) -> Vec<(StateKey, Vec<f32>)> {
        let Some(root) = self.root.as_ref() else {
            return Vec::new();
        };
        match self.config.mode {
            SearchMode::Rollout => {
                let Some(tree) = self.tree.as_ref() else {
                    return Vec::new();
                };
                let codec = ActionCodec::new(root.player_count);
                tree.iter()
                    .filter_map(|(_, node)| {
                        let mover = node.to_move(root.player_count);
                        let mut counts = vec![0u32; ACTION_SPACE];
                        for &child in &node.children {
                            let child = tree.get(child);
                            let id = child.action.and_then(|a| codec.encode(&a, mover).ok())?;
                            counts[id.index()] += child.visits();
                        }
                        let total: u32 = counts.iter().sum();
                        (total > 0).then(|| {
                            let dist = counts.iter().map(|&c| c as f32 / total as f32).collect();
                            (node.key.clone(), dist)
                        })
                    })
                    .collect()
            }
            SearchMode::Guided => self
                .table
                .iter()
                .filter(|(_, entry)| entry.total_visits() > 0)
                .map(|(key, entry)| (key.clone(), entry.visit_distribution()))
                .collect(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Arena tree of the last rollout-mode decision.
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree> {
        self.tree.as_ref()
    }

    /// Statistics of the last guided-mode decision.
    #[must_use]
    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}
