//! Nine-board tic-tac-toe rules for the search engine
//!
//! The full board is nine 3x3 sub-boards. Each move is played in the active
//! sub-board, and the cell it lands on selects the sub-board the opponent
//! must play in next. The game is decided by the first sub-board that gets
//! a completed line (won) or fills up without one (drawn).
//!
//! # Usage
//!
//! ```rust
//! use games_nineboard::{GameState, Opening, Status};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! // The opponent opened on sub-board 4, cell 7: we play second, in board 7.
//! let mut state = GameState::initialize(4, 7, Opening::SecondMover).unwrap();
//! assert_eq!(state.active_board(), 7);
//!
//! state.apply_move(0);
//! state.apply_opponent_move(3).unwrap();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let status = state.random_playout(&mut rng);
//! assert_ne!(status, Status::Ongoing);
//! ```

pub mod board;
pub mod sampler;
pub mod state;

pub use board::{Cell, MoveSet, Side, SubBoard, CELLS, FULL_MASK, LINES};
pub use sampler::{MoveSampler, ScriptedSampler};
pub use state::{GameError, GameState, Opening, Outcome, Status};
