//! Selfplay - engine-vs-engine games for nine-board tic-tac-toe
//!
//! Plays a number of complete games between two engine agents, following the
//! tournament opening protocol (random first move, then second and third
//! mover initialization), and reports the results.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod config;
mod game;

use crate::config::Config;
use crate::game::{play_game, Tally};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn run(config: &Config) -> Result<Tally> {
    let base_seed = config.base_seed().unwrap_or_else(rand::random);
    info!(
        games = config.games,
        base_seed,
        budget_mode = %config.budget_mode,
        max_turn_ms = config.max_turn_ms,
        "Starting self-play"
    );

    let mut tally = Tally::default();
    for game_index in 0..config.games {
        let seed = base_seed.wrapping_add(u64::from(game_index) * 1_000);
        let record = play_game(config, seed)?;
        tally.record(&record);

        if config.show_board {
            println!(
                "Game {} (opening board {}, {} plies, winner {}):",
                game_index + 1,
                record.opening_board,
                record.moves.len(),
                record
                    .winner()
                    .map(|side| side.symbol().to_string())
                    .unwrap_or_else(|| "none".into())
            );
            println!("{}", record.final_state);
        }
    }

    Ok(tally)
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    match run(&config) {
        Ok(tally) => {
            info!(
                circle_wins = tally.circle_wins,
                cross_wins = tally.cross_wins,
                draws = tally.draws,
                "Self-play completed"
            );
            println!("{}", tally);
            Ok(())
        }
        Err(e) => {
            error!("Self-play failed: {:#}", e);
            Err(e)
        }
    }
}
