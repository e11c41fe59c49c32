//! MCTS configuration parameters.

use std::time::Duration;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Variance bound in the UCB1-tuned exploration term
    /// `sqrt(variance * ln(N_parent) / n)`. UCB1-tuned caps it at 1/4.
    pub ucb_variance: f64,

    /// Hard iteration ceiling for a single search, whatever the clock says.
    pub max_iterations: u32,

    /// Check the wall clock once every this many iterations.
    pub time_check_interval: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            ucb_variance: 0.25,
            max_iterations: 2_000_000,
            time_check_interval: 25_000,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            ucb_variance: 0.25,
            max_iterations: 5_000,
            time_check_interval: 500,
        }
    }

    /// Builder pattern: set the iteration ceiling.
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    /// Builder pattern: set the UCB variance bound.
    pub fn with_ucb_variance(mut self, v: f64) -> Self {
        self.ucb_variance = v;
        self
    }

    /// Builder pattern: set the clock check interval.
    pub fn with_time_check_interval(mut self, n: u32) -> Self {
        self.time_check_interval = n.max(1);
        self
    }
}

/// Effort allowed for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Iterations to run at most.
    pub max_iterations: u32,

    /// Wall-clock limit, checked every `time_check_interval` iterations.
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    /// A pure iteration budget with no clock involved.
    pub fn iterations(n: u32) -> Self {
        Self {
            max_iterations: n,
            time_limit: None,
        }
    }

    /// A wall-clock budget capped by `max_iterations`.
    pub fn millis(ms: u64, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            time_limit: Some(Duration::from_millis(ms)),
        }
    }

    /// Builder pattern: add or replace the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}
