//! Monte Carlo Tree Search for nine-board tic-tac-toe.
//!
//! # Overview
//!
//! The search builds a tree one node per iteration. Each iteration consists
//! of four phases:
//!
//! 1. **Selection**: descend through fully expanded nodes using UCB1-tuned
//!    to balance exploration and exploitation
//! 2. **Expansion**: add a child for one random untried move
//! 3. **Simulation**: play uniformly random moves until the game ends
//! 4. **Backpropagation**: update visit counts and win scores along the
//!    path from the new node to the root
//!
//! The move reported is the most visited root child; its win rate is the
//! confidence of the choice.
//!
//! # Usage
//!
//! ```rust
//! use mcts::{run_mcts, GameState, MctsConfig, Opening, SearchBudget};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let state = GameState::initialize(4, 4, Opening::SecondMover).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_mcts(
//!     &state,
//!     MctsConfig::for_testing(),
//!     SearchBudget::iterations(1_000),
//!     &mut rng,
//! )
//! .unwrap();
//!
//! assert!(state.legal_moves().contains(result.action));
//! assert!((0.0..=1.0).contains(&result.confidence));
//! ```
//!
//! For a whole game, an [`Agent`] keeps the [`TimeGovernor`] state between
//! turns and plays the chosen move on the caller's [`GameState`].
//!
//! # Configuration
//!
//! - [`MctsConfig`]: exploration variance, iteration ceiling, clock check interval
//! - [`SearchBudget`]: iterations and wall-clock limit for one search
//! - [`GovernorConfig`]: per-turn targets and the confidence band

pub mod agent;
pub mod config;
pub mod governor;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use agent::Agent;
pub use config::{MctsConfig, SearchBudget};
pub use governor::{BudgetMode, GovernorConfig, TimeGovernor};
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};

pub use games_nineboard::{GameState, MoveSampler, Opening, Outcome, Side, Status};
