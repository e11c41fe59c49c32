//! Engine session for one game.
//!
//! An [`Agent`] owns everything that outlives a single search: the search
//! configuration, the time governor and the random source.

use games_nineboard::{GameError, GameState, MoveSampler};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::MctsConfig;
use crate::governor::{GovernorConfig, TimeGovernor};
use crate::search::{run_mcts, SearchError, SearchResult};

/// Plays one side of a game, one search per turn.
#[derive(Debug)]
pub struct Agent<S: MoveSampler> {
    config: MctsConfig,
    governor: TimeGovernor,
    sampler: S,
}

impl<S: MoveSampler> Agent<S> {
    pub fn new(config: MctsConfig, governor: GovernorConfig, sampler: S) -> Self {
        Self {
            config,
            governor: TimeGovernor::new(governor),
            sampler,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn governor(&self) -> &TimeGovernor {
        &self.governor
    }

    /// Search the position, play the chosen move on `state` and return the result.
    ///
    /// Fails if the game is over or it is the opponent's turn.
    pub fn choose_move(&mut self, state: &mut GameState) -> Result<SearchResult, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState(state.status()));
        }
        if state.to_move() != state.me() {
            return Err(GameError::WrongTurn {
                expected: state.me(),
                actual: state.to_move(),
            }
            .into());
        }

        let move_number = state.moves_played() + 1;
        let budget = self.governor.plan(move_number);
        let result = run_mcts(state, self.config.clone(), budget, &mut self.sampler)?;
        self.governor.record(&result);

        debug!(
            move_number,
            board = state.active_board(),
            cell = result.action,
            confidence = result.confidence,
            "Agent chose move"
        );
        state.apply_move(result.action);

        Ok(result)
    }
}

impl Agent<ChaCha20Rng> {
    /// Agent with a fixed seed, for reproducible games.
    pub fn with_seed(config: MctsConfig, governor: GovernorConfig, seed: u64) -> Self {
        Self::new(config, governor, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Agent seeded from the operating system.
    pub fn from_entropy(config: MctsConfig, governor: GovernorConfig) -> Self {
        Self::new(config, governor, ChaCha20Rng::from_entropy())
    }
}
