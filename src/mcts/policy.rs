//! Selection rules.
//!
//! Both rules see the same view of a candidate (visits, mean final score,
//! prior) and return the index of the best one. The exploitation term is
//! the mean score divided by the maximum score, so both terms live on
//! comparable scales. Ties go to the earliest candidate; callers pass
//! children in creation order (UCT) or action-id order (PUCT).

use crate::games::hanabi::MAX_SCORE;

/// What a selection rule knows about one candidate move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChildStats {
    pub visits: u32,
    /// Mean final score, in `[0, 25]`.
    pub mean: f64,
    pub prior: f32,
}

impl ChildStats {
    #[must_use]
    pub fn normalized_mean(&self) -> f64 {
        self.mean / MAX_SCORE as f64
    }
}

/// Rule for picking which candidate to descend into.
pub trait SelectionPolicy: Send + Sync {
    /// Score of one candidate. `parent_visits` is the visit count the
    /// exploration term is measured against.
    fn score(&self, child: &ChildStats, parent_visits: u32) -> f64;

    /// Index of the highest-scoring candidate, first one on ties.
    fn select(&self, children: &[ChildStats], parent_visits: u32) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, child) in children.iter().enumerate() {
            let score = self.score(child, parent_visits);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// UCT: `mean/25 + c * sqrt(ln N(parent) / N(child))`, unvisited first.
#[derive(Clone, Copy, Debug)]
pub struct Uct {
    pub exploration: f64,
}

impl Uct {
    #[must_use]
    pub fn new(exploration: f64) -> Self {
        Self { exploration }
    }
}

impl Default for Uct {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for Uct {
    fn score(&self, child: &ChildStats, parent_visits: u32) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let ln_parent = (parent_visits.max(1) as f64).ln();
        child.normalized_mean() + self.exploration * (ln_parent / child.visits as f64).sqrt()
    }
}

/// PUCT: `Q/25 + c * P * sqrt(sum N) / (1 + N(a))`.
///
/// `parent_visits` is the sum of visits over every action at the state.
#[derive(Clone, Copy, Debug)]
pub struct Puct {
    pub exploration: f64,
}

impl Puct {
    #[must_use]
    pub fn new(exploration: f64) -> Self {
        Self { exploration }
    }
}

impl Default for Puct {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl SelectionPolicy for Puct {
    fn score(&self, child: &ChildStats, parent_visits: u32) -> f64 {
        let u = self.exploration * child.prior as f64 * (parent_visits as f64).sqrt()
            / (1.0 + child.visits as f64);
        child.normalized_mean() + u
    }
}
