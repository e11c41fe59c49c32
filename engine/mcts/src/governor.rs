//! Per-turn search budgeting.
//!
//! The governor turns a target turn duration into a [`SearchBudget`]. The
//! target grows once the game leaves the opening and collapses to a short
//! turn when the previous search was already near-certain either way.

use std::time::Duration;

use tracing::debug;

use crate::config::SearchBudget;
use crate::search::SearchResult;

/// How a target duration becomes a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetMode {
    /// Stop on the wall clock, checked periodically during the search.
    Clock,
    /// Convert the target into an iteration count using measured throughput.
    /// The clock is still checked as a backstop.
    Throughput,
}

/// Turn timing parameters.
#[derive(Debug, Clone)]
pub struct GovernorConfig {
    /// Target for the engine's first move of the game (move 2 or 3).
    pub first_turn_ms: u64,
    /// Target for the remaining opening moves.
    pub fast_turn_ms: u64,
    /// Target once the game is past `early_game_moves`.
    pub max_turn_ms: u64,
    /// Target when the previous confidence left the uncertain band.
    pub end_game_turn_ms: u64,
    pub early_game_moves: u32,
    pub high_confidence: f64,
    pub low_confidence: f64,
    /// Iteration cap used in throughput mode before anything was measured.
    pub initial_iterations: u32,
    /// Hard ceiling on any planned iteration count.
    pub max_iterations: u32,
    pub budget_mode: BudgetMode,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            first_turn_ms: 1_000,
            fast_turn_ms: 1_000,
            max_turn_ms: 3_500,
            end_game_turn_ms: 250,
            early_game_moves: 9,
            high_confidence: 0.8,
            low_confidence: 0.3,
            initial_iterations: 100_000,
            max_iterations: 2_000_000,
            budget_mode: BudgetMode::Clock,
        }
    }
}

/// Carries the throughput estimate and last confidence across turns of one game.
#[derive(Debug, Clone)]
pub struct TimeGovernor {
    config: GovernorConfig,
    /// Iterations per millisecond, fixed by the first timed search.
    throughput: Option<f64>,
    confidence: f64,
}

impl TimeGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            throughput: None,
            confidence: 0.5,
        }
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn throughput(&self) -> Option<f64> {
        self.throughput
    }

    /// Confidence reported by the most recent search (0.5 before any).
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Target duration for the given move number (1-based, whole game).
    pub fn target_ms(&self, move_number: u32) -> u64 {
        let config = &self.config;
        if self.confidence > config.high_confidence || self.confidence < config.low_confidence {
            return config.end_game_turn_ms;
        }
        if move_number <= 3 {
            config.first_turn_ms
        } else if move_number > config.early_game_moves {
            config.max_turn_ms
        } else {
            config.fast_turn_ms
        }
    }

    /// Budget for the search about to play `move_number`.
    pub fn plan(&self, move_number: u32) -> SearchBudget {
        let target_ms = self.target_ms(move_number);
        let time_limit = Duration::from_millis(target_ms);

        let max_iterations = match self.config.budget_mode {
            BudgetMode::Clock => self.config.max_iterations,
            BudgetMode::Throughput => match self.throughput {
                Some(rate) => {
                    let planned = (rate * target_ms as f64).round();
                    (planned as u64).clamp(1, self.config.max_iterations as u64) as u32
                }
                None => self
                    .config
                    .initial_iterations
                    .min(self.config.max_iterations)
                    .max(1),
            },
        };

        debug!(
            move_number,
            target_ms,
            max_iterations,
            confidence = self.confidence,
            mode = ?self.config.budget_mode,
            "Planned search budget"
        );

        SearchBudget {
            max_iterations,
            time_limit: Some(time_limit),
        }
    }

    /// Fold a finished search into the carried state.
    pub fn record(&mut self, result: &SearchResult) {
        if self.throughput.is_none() {
            if let Some(rate) = result.iterations_per_ms() {
                debug!(iterations_per_ms = rate, "Measured search throughput");
                self.throughput = Some(rate);
            }
        }
        self.confidence = result.confidence;
    }
}

impl Default for TimeGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(iterations: u32, elapsed_ms: u64, confidence: f64) -> SearchResult {
        SearchResult {
            action: 0,
            confidence,
            iterations,
            elapsed: Duration::from_millis(elapsed_ms),
            tree_nodes: iterations as usize + 1,
        }
    }

    #[test]
    fn test_turn_targets_by_move_number() {
        let governor = TimeGovernor::default();
        assert_eq!(governor.target_ms(2), 1_000);
        assert_eq!(governor.target_ms(3), 1_000);
        assert_eq!(governor.target_ms(9), 1_000);
        assert_eq!(governor.target_ms(10), 3_500);
        assert_eq!(governor.target_ms(60), 3_500);
    }

    #[test]
    fn test_extreme_confidence_shortens_turn() {
        let mut governor = TimeGovernor::default();

        governor.record(&result(1_000, 10, 0.95));
        assert_eq!(governor.target_ms(20), 250);

        governor.record(&result(1_000, 10, 0.1));
        assert_eq!(governor.target_ms(20), 250);

        // Boundaries stay inside the band
        governor.record(&result(1_000, 10, 0.8));
        assert_eq!(governor.target_ms(20), 3_500);
        governor.record(&result(1_000, 10, 0.3));
        assert_eq!(governor.target_ms(20), 3_500);
    }

    #[test]
    fn test_clock_mode_plan() {
        let governor = TimeGovernor::default();
        let budget = governor.plan(12);
        assert_eq!(budget.max_iterations, 2_000_000);
        assert_eq!(budget.time_limit, Some(Duration::from_millis(3_500)));
    }

    #[test]
    fn test_throughput_mode_uses_initial_iterations_until_measured() {
        let config = GovernorConfig {
            budget_mode: BudgetMode::Throughput,
            ..Default::default()
        };
        let mut governor = TimeGovernor::new(config);

        assert_eq!(governor.plan(2).max_iterations, 100_000);

        // 50_000 iterations in 100 ms = 500 per ms
        governor.record(&result(50_000, 100, 0.5));
        assert_eq!(governor.throughput(), Some(500.0));
        let budget = governor.plan(4);
        assert_eq!(budget.max_iterations, 500_000);
        assert_eq!(budget.time_limit, Some(Duration::from_millis(1_000)));

        // Only the first measurement counts
        governor.record(&result(10, 100, 0.5));
        assert_eq!(governor.throughput(), Some(500.0));

        // Long turns scale with the target
        assert_eq!(governor.plan(12).max_iterations, 1_750_000);
    }

    #[test]
    fn test_throughput_plan_is_capped() {
        let mut governor = TimeGovernor::new(GovernorConfig {
            budget_mode: BudgetMode::Throughput,
            ..Default::default()
        });
        governor.record(&result(100_000, 10, 0.5));
        assert_eq!(governor.plan(12).max_iterations, 2_000_000);
    }

    #[test]
    fn test_unmeasured_throughput_plan_is_never_empty() {
        let governor = TimeGovernor::new(GovernorConfig {
            budget_mode: BudgetMode::Throughput,
            initial_iterations: 0,
            ..Default::default()
        });
        assert_eq!(governor.plan(2).max_iterations, 1);
    }

    #[test]
    fn test_zero_elapsed_does_not_fix_throughput() {
        let mut governor = TimeGovernor::new(GovernorConfig {
            budget_mode: BudgetMode::Throughput,
            ..Default::default()
        });
        governor.record(&result(0, 0, 0.5));
        assert_eq!(governor.throughput(), None);
        assert_eq!(governor.confidence(), 0.5);
    }
}
