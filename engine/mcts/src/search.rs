//! MCTS search implementation.
//!
//! Each iteration runs the four classic phases:
//! 1. Selection: descend through fully expanded nodes by UCB1-tuned score
//! 2. Expansion: add one random untried move as a new child
//! 3. Simulation: finish the game with uniformly random moves
//! 4. Backpropagation: credit the result to every node on the path
//!
//! The search runs until its [`SearchBudget`] is spent. The wall clock is
//! only consulted every `time_check_interval` iterations.

use std::time::{Duration, Instant};

use games_nineboard::{GameError, GameState, MoveSampler, Outcome, Status};
use thiserror::Error;
use tracing::{debug, trace, warn, Level};

use crate::config::{MctsConfig, SearchBudget};
use crate::tree::MctsTree;

/// Upper bound on nodes reserved up front; larger trees grow on demand.
const MAX_PREALLOCATED_NODES: usize = 1 << 16;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot search a finished game ({0:?})")]
    TerminalState(Status),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Cell to play in the active sub-board
    pub action: u8,

    /// Win rate of the chosen child for the side to move, in [0, 1]
    pub confidence: f64,

    /// Number of completed iterations
    pub iterations: u32,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// Nodes in the tree when the search stopped
    pub tree_nodes: usize,
}

impl SearchResult {
    /// Observed search speed, `None` when the clock did not advance.
    pub fn iterations_per_ms(&self) -> Option<f64> {
        let ms = self.elapsed.as_micros() as f64 / 1000.0;
        if ms > 0.0 {
            Some(self.iterations as f64 / ms)
        } else {
            None
        }
    }
}

/// MCTS search state.
pub struct MctsSearch {
    tree: MctsTree,
    root_state: GameState,
    config: MctsConfig,
}

impl MctsSearch {
    /// Create a new MCTS search from the given game state.
    pub fn new(state: &GameState, config: MctsConfig) -> Result<Self, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState(state.status()));
        }

        let capacity = (config.max_iterations as usize).min(MAX_PREALLOCATED_NODES) + 1;
        let tree = MctsTree::with_capacity(state, capacity);

        Ok(Self {
            tree,
            root_state: *state,
            config,
        })
    }

    /// Run iterations until the budget is spent and pick the most visited move.
    pub fn run<S: MoveSampler + ?Sized>(
        &mut self,
        budget: SearchBudget,
        sampler: &mut S,
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let max_iterations = budget.max_iterations.min(self.config.max_iterations);
        let check_every = self.config.time_check_interval.max(1);

        let mut iterations = 0u32;
        while iterations < max_iterations {
            if let Some(limit) = budget.time_limit {
                if iterations > 0 && iterations % check_every == 0 && start.elapsed() > limit {
                    trace!(iterations, "Search deadline reached");
                    break;
                }
            }
            self.iterate(sampler);
            iterations += 1;
        }
        let elapsed = start.elapsed();

        let (action, confidence) = match self.tree.best_child() {
            Some((action, id)) => (action, self.tree.get(id).win_rate()),
            None => {
                // Nothing was expanded, so there is nothing to rank.
                let moves = self.tree.get(self.tree.root()).untried_moves();
                if moves.is_empty() {
                    return Err(SearchError::NoLegalMoves);
                }
                let action = moves
                    .nth_move(sampler.pick(moves.len()))
                    .ok_or(SearchError::NoLegalMoves)?;
                warn!(action, "Search budget exhausted before any expansion; playing a random move");
                (action, 0.5)
            }
        };

        let result = SearchResult {
            action,
            confidence,
            iterations,
            elapsed,
            tree_nodes: self.tree.len(),
        };
        self.log_summary(&result);

        Ok(result)
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    pub fn iterate<S: MoveSampler + ?Sized>(&mut self, sampler: &mut S) {
        let mut state = self.root_state;
        let mut node_id = self.tree.root();

        // Selection: follow UCB while every move of the node has been tried
        while self.tree.get(node_id).is_fully_expanded() {
            match self.tree.select_child(node_id, self.config.ucb_variance) {
                Some((action, child_id)) => {
                    state.apply_move(action);
                    node_id = child_id;
                }
                None => break,
            }
        }

        // Expansion: terminal nodes have no untried moves and stay leaves
        if !state.is_terminal() {
            let untried = self.tree.get(node_id).untried_moves();
            if !untried.is_empty() {
                if let Some(action) = untried.nth_move(sampler.pick(untried.len())) {
                    state.apply_move(action);
                    node_id = self.tree.add_child(node_id, action, &state);
                }
            }
        }

        // Simulation
        let status = state.random_playout(sampler);
        let outcome = Outcome {
            mover: state.last_mover(),
            status,
        };

        // Backpropagation
        self.tree.backpropagate(node_id, &outcome);
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    fn log_summary(&self, result: &SearchResult) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        let children = self
            .tree
            .root_children()
            .iter()
            .map(|(action, visits, rate)| format!("{}:{}/{:.3}", action, visits, rate))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(
            action = result.action,
            confidence = result.confidence,
            iterations = result.iterations,
            elapsed_ms = result.elapsed.as_millis() as u64,
            tree_nodes = result.tree_nodes,
            max_depth = self.tree.stats().max_depth,
            children = %children,
            "MCTS search complete"
        );
    }
}

/// Convenience function to run MCTS search.
pub fn run_mcts<S: MoveSampler + ?Sized>(
    state: &GameState,
    config: MctsConfig,
    budget: SearchBudget,
    sampler: &mut S,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(state, config)?;
    search.run(budget, sampler)
}
