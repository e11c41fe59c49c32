//! One self-play game between two engine agents.
//!
//! Cross opens with a random move. The agent playing Circle then starts as
//! second mover, and the agent playing Cross joins as third mover once it
//! has seen Circle's reply. Each agent keeps its own view of the board and
//! learns the other's moves through `apply_opponent_move`.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use games_nineboard::{GameState, MoveSampler, Opening, Outcome, Side};
use mcts::Agent;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::config::Config;

/// A finished game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Cells in play order, starting with the random opening move.
    pub moves: Vec<u8>,
    /// Sub-board of the opening move.
    pub opening_board: u8,
    pub outcome: Outcome,
    pub final_state: GameState,
    /// Total iterations over every search of the game.
    pub iterations: u64,
    pub elapsed: Duration,
}

impl GameRecord {
    pub fn winner(&self) -> Option<Side> {
        self.outcome.winner()
    }
}

/// Play one game. The opening and both agents derive their seeds from `seed`.
pub fn play_game(config: &Config, seed: u64) -> Result<GameRecord> {
    let start = Instant::now();
    let mcts_config = config.mcts_config();
    let governor_config = config.governor_config()?;

    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let opening_board = rng.pick(9) as u8;
    let opening_cell = rng.pick(9) as u8;
    debug!(board = opening_board, cell = opening_cell, "Random opening");

    let mut circle = Agent::with_seed(
        mcts_config.clone(),
        governor_config.clone(),
        seed.wrapping_add(1),
    );
    let mut cross = Agent::with_seed(mcts_config, governor_config, seed.wrapping_add(2));

    let mut moves = vec![opening_cell];
    let mut iterations = 0u64;

    let mut circle_view =
        GameState::initialize(opening_board, opening_cell, Opening::SecondMover)
            .context("initializing second mover")?;
    let reply = circle
        .choose_move(&mut circle_view)
        .context("second mover search")?;
    iterations += reply.iterations as u64;
    moves.push(reply.action);

    let mut cross_view = GameState::initialize(
        opening_board,
        reply.action,
        Opening::ThirdMover {
            own_first_cell: opening_cell,
        },
    )
    .context("initializing third mover")?;

    // Cross moves next; sides swap after every move until the game ends.
    let mut mover = (&mut cross, &mut cross_view);
    let mut waiting = (&mut circle, &mut circle_view);
    while !mover.1.is_terminal() {
        let (agent, view) = (&mut *mover.0, &mut *mover.1);
        let result = agent.choose_move(view).context("agent search")?;
        iterations += result.iterations as u64;
        moves.push(result.action);
        debug!(
            ply = moves.len(),
            side = ?view.me(),
            cell = result.action,
            confidence = result.confidence,
            iterations = result.iterations,
            "Move played"
        );

        waiting
            .1
            .apply_opponent_move(result.action)
            .with_context(|| format!("relaying move {} to the opponent", result.action))?;
        std::mem::swap(&mut mover, &mut waiting);
    }

    if circle_view.boards() != cross_view.boards() {
        return Err(anyhow!("agent views diverged"));
    }
    let outcome = circle_view
        .outcome()
        .ok_or_else(|| anyhow!("game loop ended before the game did"))?;

    let record = GameRecord {
        moves,
        opening_board,
        outcome,
        final_state: circle_view,
        iterations,
        elapsed: start.elapsed(),
    };
    info!(
        seed,
        plies = record.moves.len(),
        winner = ?record.winner(),
        iterations = record.iterations,
        elapsed_ms = record.elapsed.as_millis() as u64,
        "Game finished"
    );

    Ok(record)
}

/// Running totals over a self-play session.
#[derive(Debug, Default, Clone)]
pub struct Tally {
    pub circle_wins: u32,
    pub cross_wins: u32,
    pub draws: u32,
    pub total_plies: u64,
}

impl Tally {
    pub fn record(&mut self, game: &GameRecord) {
        match game.winner() {
            Some(Side::Circle) => self.circle_wins += 1,
            Some(Side::Cross) => self.cross_wins += 1,
            None => self.draws += 1,
        }
        self.total_plies += game.moves.len() as u64;
    }

    pub fn games(&self) -> u32 {
        self.circle_wins + self.cross_wins + self.draws
    }

    pub fn avg_plies(&self) -> f64 {
        if self.games() == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games() as f64
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: O {} / X {} / draw {} (avg {:.1} plies)",
            self.games(),
            self.circle_wins,
            self.cross_wins,
            self.draws,
            self.avg_plies()
        )
    }
}
