//! Game state machine for nine-board tic-tac-toe.
//!
//! The state tracks the nine sub-boards, which sub-board is active, who moved
//! last, and the terminal status of the game from the last mover's point of
//! view. A move's cell index selects the sub-board the opponent must play in
//! next. The game ends as soon as a move wins or fills the sub-board it was
//! played into.

use std::fmt;

use thiserror::Error;

use crate::board::{MoveSet, Side, SubBoard, CELLS};
use crate::sampler::MoveSampler;

/// Errors raised when a caller hands the state machine inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Sub-board index {0} out of range (expected 0-8)")]
    BoardOutOfRange(u8),

    #[error("Cell index {0} out of range (expected 0-8)")]
    CellOutOfRange(u8),

    #[error("Cell {cell} of sub-board {board} is already occupied")]
    CellOccupied { board: u8, cell: u8 },

    #[error("Game is already over ({0:?})")]
    GameOver(Status),

    #[error("Expected a move from {expected:?}, but {actual:?} is to move")]
    WrongTurn { expected: Side, actual: Side },

    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

/// Terminal status, always read from the perspective of the side that moved last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Won,
    Lost,
    Drawn,
}

impl Status {
    /// Reward for the last mover: 1 for a win, 0 for a loss, 0.5 for a draw.
    /// `None` while the game is still going.
    #[inline]
    pub fn reward(self) -> Option<f64> {
        match self {
            Status::Ongoing => None,
            Status::Won => Some(1.0),
            Status::Lost => Some(0.0),
            Status::Drawn => Some(0.5),
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Status::Ongoing
    }
}

/// Final result of a game, tied to the side that made the last move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub mover: Side,
    pub status: Status,
}

impl Outcome {
    /// Reward re-expressed from `side`'s point of view.
    ///
    /// The game is zero-sum, so the non-mover receives `1 - reward`. Draws
    /// are 0.5 for both sides.
    #[inline]
    pub fn reward_for(&self, side: Side) -> f64 {
        let reward = self.status.reward().unwrap_or(0.5);
        if side == self.mover {
            reward
        } else {
            1.0 - reward
        }
    }

    /// The winning side, if any.
    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::Won => Some(self.mover),
            Status::Lost => Some(self.mover.opponent()),
            Status::Ongoing | Status::Drawn => None,
        }
    }
}

/// How the engine joins the game after the mandatory opening move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// The opponent made move 1; we make move 2.
    SecondMover,
    /// We made move 1 on `own_first_cell`, the opponent replied; we make move 3.
    ThirdMover { own_first_cell: u8 },
}

/// Complete game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    boards: [SubBoard; CELLS],
    /// Sub-board the next move must be played in.
    active_board: u8,
    last_mover: Side,
    status: Status,
    /// Side played by the engine, fixed for the whole game.
    me: Side,
}

impl GameState {
    /// Build the state after the opening moves.
    ///
    /// `board` is the sub-board of move 1 and `prior_move` the cell of the
    /// opponent's most recent move, which also selects the active sub-board.
    pub fn initialize(board: u8, prior_move: u8, opening: Opening) -> Result<Self, GameError> {
        check_board(board)?;
        check_cell(prior_move)?;

        let mut boards = [SubBoard::EMPTY; CELLS];
        let (me, last_mover) = match opening {
            Opening::SecondMover => {
                boards[board as usize] = SubBoard::EMPTY.with_mark(prior_move, Side::Cross);
                (Side::Circle, Side::Cross)
            }
            Opening::ThirdMover { own_first_cell } => {
                check_cell(own_first_cell)?;
                boards[board as usize] = SubBoard::EMPTY.with_mark(own_first_cell, Side::Cross);
                let reply_board = own_first_cell as usize;
                if boards[reply_board].occupied() & (1 << prior_move) != 0 {
                    return Err(GameError::CellOccupied {
                        board: own_first_cell,
                        cell: prior_move,
                    });
                }
                boards[reply_board] = boards[reply_board].with_mark(prior_move, Side::Circle);
                (Side::Cross, Side::Circle)
            }
        };

        Ok(Self {
            boards,
            active_board: prior_move,
            last_mover,
            status: Status::Ongoing,
            me,
        })
    }

    /// Restore an arbitrary ongoing position.
    ///
    /// The position must not already be decided: no sub-board may be won or
    /// full, since the game would have ended when that happened.
    pub fn from_boards(
        boards: [SubBoard; CELLS],
        active_board: u8,
        last_mover: Side,
        me: Side,
    ) -> Result<Self, GameError> {
        check_board(active_board)?;
        for (index, board) in boards.iter().enumerate() {
            if board.is_full() || board.is_won(Side::Circle) || board.is_won(Side::Cross) {
                return Err(GameError::InvalidPosition(format!(
                    "sub-board {} is already decided",
                    index
                )));
            }
        }
        Ok(Self {
            boards,
            active_board,
            last_mover,
            status: Status::Ongoing,
            me,
        })
    }

    #[inline]
    pub fn boards(&self) -> &[SubBoard; CELLS] {
        &self.boards
    }

    #[inline]
    pub fn board(&self, index: u8) -> SubBoard {
        self.boards[index as usize]
    }

    #[inline]
    pub fn active_board(&self) -> u8 {
        self.active_board
    }

    #[inline]
    pub fn last_mover(&self) -> Side {
        self.last_mover
    }

    /// Side that makes the next move.
    #[inline]
    pub fn to_move(&self) -> Side {
        self.last_mover.opponent()
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Side played by the engine.
    #[inline]
    pub fn me(&self) -> Side {
        self.me
    }

    #[inline]
    pub fn opponent(&self) -> Side {
        self.me.opponent()
    }

    /// Total marks on the nine sub-boards.
    pub fn moves_played(&self) -> u32 {
        self.boards.iter().map(|b| b.marks()).sum()
    }

    /// Legal moves in the active sub-board; empty once the game is over.
    #[inline]
    pub fn legal_moves(&self) -> MoveSet {
        if self.is_terminal() {
            return MoveSet::from_mask(0);
        }
        self.boards[self.active_board as usize].legal_moves()
    }

    /// Result of a finished game, `None` while it is still going.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_terminal() {
            Some(Outcome {
                mover: self.last_mover,
                status: self.status,
            })
        } else {
            None
        }
    }

    /// Play `cell` in the active sub-board for the side to move.
    ///
    /// Panics if the cell is occupied; callers must only pass legal moves.
    #[inline]
    pub fn apply_move(&mut self, cell: u8) {
        debug_assert!(!self.is_terminal(), "move applied to a finished game");
        let mover = self.last_mover.opponent();
        let played = self.active_board as usize;
        self.boards[played] = self.boards[played].with_mark(cell, mover);
        self.active_board = cell;
        self.last_mover = mover;
        self.status = evaluate(self.boards[played], mover);
    }

    /// Validated form of [`apply_move`](Self::apply_move) for the opponent's moves.
    pub fn apply_opponent_move(&mut self, cell: u8) -> Result<(), GameError> {
        check_cell(cell)?;
        if self.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }
        if self.to_move() != self.opponent() {
            return Err(GameError::WrongTurn {
                expected: self.opponent(),
                actual: self.to_move(),
            });
        }
        if !self.legal_moves().contains(cell) {
            return Err(GameError::CellOccupied {
                board: self.active_board,
                cell,
            });
        }
        self.apply_move(cell);
        Ok(())
    }

    /// Play uniformly random legal moves until the game ends.
    pub fn random_playout<S: MoveSampler + ?Sized>(&mut self, sampler: &mut S) -> Status {
        while !self.is_terminal() {
            let moves = self.legal_moves();
            debug_assert!(!moves.is_empty(), "ongoing game with a full active board");
            let pick = sampler.pick(moves.len());
            let cell = moves
                .nth_move(pick)
                .unwrap_or_else(|| panic!("sampler returned {} for {} moves", pick, moves.len()));
            self.apply_move(cell);
        }
        self.status
    }
}

/// Terminal status of the sub-board just played into, for `mover`.
#[inline]
fn evaluate(board: SubBoard, mover: Side) -> Status {
    if board.is_won(mover) {
        Status::Won
    } else if board.is_won(mover.opponent()) {
        Status::Lost
    } else if board.is_full() {
        Status::Drawn
    } else {
        Status::Ongoing
    }
}

fn check_board(board: u8) -> Result<(), GameError> {
    if (board as usize) < CELLS {
        Ok(())
    } else {
        Err(GameError::BoardOutOfRange(board))
    }
}

fn check_cell(cell: u8) -> Result<(), GameError> {
    if (cell as usize) < CELLS {
        Ok(())
    } else {
        Err(GameError::CellOutOfRange(cell))
    }
}

impl fmt::Display for GameState {
    /// Renders the full 9x9 grid, sub-boards laid out row-major.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for big_row in 0..3u8 {
            if big_row > 0 {
                writeln!(f, "------+-------+------")?;
            }
            for small_row in 0..3u8 {
                let mut line = String::with_capacity(24);
                for big_col in 0..3u8 {
                    if big_col > 0 {
                        line.push_str("| ");
                    }
                    let board = self.boards[(big_row * 3 + big_col) as usize];
                    for small_col in 0..3u8 {
                        let symbol = match board.cell(small_row * 3 + small_col) {
                            crate::board::Cell::Empty => '.',
                            crate::board::Cell::Circle => Side::Circle.symbol(),
                            crate::board::Cell::Cross => Side::Cross.symbol(),
                        };
                        line.push(symbol);
                        line.push(' ');
                    }
                }
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ScriptedSampler;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Sub-board 0 with circles on 0,1 and everything but cell 2 filled,
    /// no line complete. Circle to move, active board 0.
    fn row_zero_almost_won() -> GameState {
        // O O . / X X O / O O X
        let circles = 0b011_100_011;
        let crosses = 0b100_011_000;
        let mut boards = [SubBoard::EMPTY; CELLS];
        boards[0] = SubBoard::from_planes(circles, crosses);
        GameState::from_boards(boards, 0, Side::Cross, Side::Circle).unwrap()
    }

    #[test]
    fn test_second_mover_initialization() {
        let state = GameState::initialize(4, 7, Opening::SecondMover).unwrap();
        assert_eq!(state.me(), Side::Circle);
        assert_eq!(state.opponent(), Side::Cross);
        assert_eq!(state.last_mover(), Side::Cross);
        assert_eq!(state.to_move(), Side::Circle);
        assert_eq!(state.active_board(), 7);
        assert_eq!(state.board(4).crosses(), 1 << 7);
        assert_eq!(state.moves_played(), 1);
        assert_eq!(state.status(), Status::Ongoing);
    }

    #[test]
    fn test_third_mover_initialization() {
        // We opened on board 2 cell 5, opponent replied on board 5 cell 8.
        let state =
            GameState::initialize(2, 8, Opening::ThirdMover { own_first_cell: 5 }).unwrap();
        assert_eq!(state.me(), Side::Cross);
        assert_eq!(state.last_mover(), Side::Circle);
        assert_eq!(state.to_move(), Side::Cross);
        assert_eq!(state.active_board(), 8);
        assert_eq!(state.board(2).crosses(), 1 << 5);
        assert_eq!(state.board(5).circles(), 1 << 8);
        assert_eq!(state.moves_played(), 2);
    }

    #[test]
    fn test_third_mover_same_board_rejects_collision() {
        // Opening on board 3 cell 3 sends the reply to board 3; cell 3 is taken.
        let err = GameState::initialize(3, 3, Opening::ThirdMover { own_first_cell: 3 })
            .unwrap_err();
        assert_eq!(err, GameError::CellOccupied { board: 3, cell: 3 });
    }

    #[test]
    fn test_initialize_rejects_out_of_range() {
        assert_eq!(
            GameState::initialize(9, 0, Opening::SecondMover).unwrap_err(),
            GameError::BoardOutOfRange(9)
        );
        assert_eq!(
            GameState::initialize(0, 12, Opening::SecondMover).unwrap_err(),
            GameError::CellOutOfRange(12)
        );
    }

    #[test]
    fn test_apply_move_switches_board_and_mover() {
        let mut state = GameState::initialize(0, 4, Opening::SecondMover).unwrap();
        state.apply_move(6);

        assert_eq!(state.board(4).circles(), 1 << 6);
        assert_eq!(state.active_board(), 6);
        assert_eq!(state.last_mover(), Side::Circle);
        assert_eq!(state.status(), Status::Ongoing);

        state.apply_move(1);
        assert_eq!(state.board(6).crosses(), 1 << 1);
        assert_eq!(state.active_board(), 1);
        assert_eq!(state.last_mover(), Side::Cross);
    }

    #[test]
    fn test_completing_a_line_wins() {
        let mut state = row_zero_almost_won();
        assert_eq!(state.legal_moves().collect::<Vec<_>>(), vec![2]);

        state.apply_move(2);
        assert_eq!(state.status(), Status::Won);
        assert_eq!(state.last_mover(), Side::Circle);
        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.winner(), Some(Side::Circle));
        assert_eq!(outcome.reward_for(Side::Circle), 1.0);
        assert_eq!(outcome.reward_for(Side::Cross), 0.0);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_evaluate_reports_opponent_line_as_lost() {
        // X X X / O O . / . . . with Circle as the side that just moved.
        let board = SubBoard::from_planes(0b000_011_000, 0b000_000_111);
        assert_eq!(evaluate(board, Side::Circle), Status::Lost);
        assert_eq!(evaluate(board, Side::Cross), Status::Won);

        let outcome = Outcome {
            mover: Side::Circle,
            status: Status::Lost,
        };
        assert_eq!(outcome.winner(), Some(Side::Cross));
        assert_eq!(outcome.reward_for(Side::Circle), 0.0);
        assert_eq!(outcome.reward_for(Side::Cross), 1.0);
    }

    #[test]
    fn test_evaluate_prefers_win_over_full_board() {
        // O O O / X X O / O O X: full, and Circle holds row 0.
        let board = SubBoard::from_planes(0b011_100_111, 0b100_011_000);
        assert!(board.is_full());
        assert_eq!(evaluate(board, Side::Circle), Status::Won);
    }

    #[test]
    fn test_filling_a_board_without_line_draws() {
        // O X O / O X X / X O . -> Cross plays 8: O X O / O X X / X O X, no line.
        let circles = 0b010_001_101;
        let crosses = 0b001_110_010;
        let mut boards = [SubBoard::EMPTY; CELLS];
        boards[3] = SubBoard::from_planes(circles, crosses);
        let mut state = GameState::from_boards(boards, 3, Side::Circle, Side::Cross).unwrap();

        state.apply_move(8);
        assert!(state.board(3).is_full());
        assert!(!state.board(3).is_won(Side::Cross));
        assert!(!state.board(3).is_won(Side::Circle));
        assert_eq!(state.status(), Status::Drawn);
        assert_eq!(state.outcome().unwrap().reward_for(Side::Circle), 0.5);
    }

    #[test]
    fn test_playout_one_move_from_draw_takes_one_step() {
        let circles = 0b010_001_101;
        let crosses = 0b001_110_010;
        let mut boards = [SubBoard::EMPTY; CELLS];
        boards[3] = SubBoard::from_planes(circles, crosses);
        let mut state = GameState::from_boards(boards, 3, Side::Circle, Side::Cross).unwrap();

        let mut sampler = ScriptedSampler::new(vec![0]);
        let status = state.random_playout(&mut sampler);
        assert_eq!(status, Status::Drawn);
        assert_eq!(sampler.calls(), 1);
    }

    #[test]
    fn test_random_playout_terminates() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for seed in 0..50u8 {
            let mut state =
                GameState::initialize(seed % 9, (seed / 9) % 9, Opening::SecondMover).unwrap();
            let before = state.moves_played();
            let status = state.random_playout(&mut rng);
            assert!(status.is_terminal());
            assert!(state.moves_played() > before);
            assert!(state.moves_played() <= 81);
        }
    }

    #[test]
    fn test_apply_opponent_move_validation() {
        // Second mover: it is our (Circle) turn first.
        let mut state = GameState::initialize(0, 4, Opening::SecondMover).unwrap();
        assert_eq!(
            state.apply_opponent_move(3).unwrap_err(),
            GameError::WrongTurn {
                expected: Side::Cross,
                actual: Side::Circle
            }
        );

        state.apply_move(0); // our move into board 4, sends opponent to board 0
        assert_eq!(
            state.apply_opponent_move(4).unwrap_err(),
            GameError::CellOccupied { board: 0, cell: 4 }
        );
        assert_eq!(
            state.apply_opponent_move(9).unwrap_err(),
            GameError::CellOutOfRange(9)
        );
        state.apply_opponent_move(8).unwrap();
        assert_eq!(state.active_board(), 8);
        assert_eq!(state.last_mover(), Side::Cross);
    }

    #[test]
    fn test_apply_opponent_move_after_game_over() {
        let mut state = row_zero_almost_won();
        state.apply_move(2);
        assert_eq!(
            state.apply_opponent_move(0).unwrap_err(),
            GameError::GameOver(Status::Won)
        );
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_apply_move_on_occupied_cell_panics() {
        let mut state = GameState::initialize(0, 0, Opening::SecondMover).unwrap();
        // Active board 0 already holds the cross on cell 0.
        state.apply_move(0);
    }

    #[test]
    fn test_from_boards_rejects_decided_board() {
        let mut boards = [SubBoard::EMPTY; CELLS];
        boards[5] = SubBoard::from_planes(0b111, 0);
        assert!(matches!(
            GameState::from_boards(boards, 0, Side::Cross, Side::Circle),
            Err(GameError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_display_renders_marks() {
        let state = GameState::initialize(0, 4, Opening::SecondMover).unwrap();
        let rendered = state.to_string();
        assert_eq!(rendered.matches('X').count(), 1);
        assert_eq!(rendered.lines().count(), 11);
    }
}
