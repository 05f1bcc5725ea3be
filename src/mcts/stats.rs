//! Search diagnostics and running statistics.

use serde::{Deserialize, Serialize};

/// Counters collected during one decision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed iterations (backed up).
    pub iterations: u32,

    /// Iterations skipped because no consistent determinization was found.
    pub failed_determinizations: u32,

    /// Nodes added to the tree, or new keys added to the table.
    pub nodes_expanded: u32,

    /// Calls made to the policy/value network.
    pub network_evaluations: u32,

    /// Deepest selection path, in moves from the root.
    pub max_depth: u16,

    /// Wall-clock time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Completed iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of attempted iterations that found a determinization.
    #[must_use]
    pub fn determinization_success_rate(&self) -> f64 {
        let attempted = self.iterations + self.failed_determinizations;
        if attempted == 0 {
            0.0
        } else {
            self.iterations as f64 / attempted as f64
        }
    }
}

/// Incrementally updated mean: `Q += (v - Q) / N`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningMean {
    count: u32,
    mean: f64,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Zero until the first sample.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

/// Min/max/mean/count over a stream of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    mean: RunningMean,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        if self.mean.count() == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.mean.push(value);
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.mean.count()
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean.mean()
    }

    /// `None` before any sample.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        (self.count() > 0).then_some(self.min)
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (self.count() > 0).then_some(self.max)
    }
}

impl std::fmt::Display for RunningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => write!(
                f,
                "n={} mean={:.2} min={:.2} max={:.2}",
                self.count(),
                self.mean(),
                min,
                max
            ),
            _ => write!(f, "n=0"),
        }
    }
}
