//! Configuration for the self-play driver
//!
//! Defaults come from the central config (config.toml plus `NINEBOARD_*`
//! environment overrides). CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use engine_config::{load_config, CentralConfig};
use mcts::{BudgetMode, GovernorConfig, MctsConfig};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_games() -> u32 {
    CENTRAL_CONFIG.selfplay.games
}

fn default_show_board() -> bool {
    CENTRAL_CONFIG.selfplay.show_board
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_ucb_variance() -> f64 {
    CENTRAL_CONFIG.mcts.ucb_variance
}

fn default_max_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.max_iterations
}

fn default_time_check_interval() -> u32 {
    CENTRAL_CONFIG.mcts.time_check_interval
}

fn default_first_turn_ms() -> u64 {
    CENTRAL_CONFIG.governor.first_turn_ms
}

fn default_fast_turn_ms() -> u64 {
    CENTRAL_CONFIG.governor.fast_turn_ms
}

fn default_max_turn_ms() -> u64 {
    CENTRAL_CONFIG.governor.max_turn_ms
}

fn default_end_game_turn_ms() -> u64 {
    CENTRAL_CONFIG.governor.end_game_turn_ms
}

fn default_early_game_moves() -> u32 {
    CENTRAL_CONFIG.governor.early_game_moves
}

fn default_high_confidence() -> f64 {
    CENTRAL_CONFIG.governor.high_confidence
}

fn default_low_confidence() -> f64 {
    CENTRAL_CONFIG.governor.low_confidence
}

fn default_initial_iterations() -> u32 {
    CENTRAL_CONFIG.governor.initial_iterations
}

fn default_budget_mode() -> String {
    CENTRAL_CONFIG.governor.budget_mode.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "selfplay")]
#[command(about = "Nine-board tic-tac-toe engine self-play")]
#[command(
    long_about = "Plays complete games between two engine instances: a random opening
move, then one agent as second mover and one as third mover.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Base seed for reproducible games (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the final position of every game
    #[arg(long, default_value_t = default_show_board(), action = ArgAction::Set)]
    pub show_board: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Variance bound of the UCB1-tuned exploration term
    #[arg(long, default_value_t = default_ucb_variance())]
    pub ucb_variance: f64,

    /// Hard iteration ceiling per search
    #[arg(long, default_value_t = default_max_iterations())]
    pub max_iterations: u32,

    /// Iterations between wall-clock checks
    #[arg(long, default_value_t = default_time_check_interval())]
    pub time_check_interval: u32,

    /// Turn target for an agent's first move, in milliseconds
    #[arg(long, default_value_t = default_first_turn_ms())]
    pub first_turn_ms: u64,

    /// Turn target during the opening, in milliseconds
    #[arg(long, default_value_t = default_fast_turn_ms())]
    pub fast_turn_ms: u64,

    /// Turn target after the opening, in milliseconds
    #[arg(long, default_value_t = default_max_turn_ms())]
    pub max_turn_ms: u64,

    /// Turn target once the previous search was near-certain, in milliseconds
    #[arg(long, default_value_t = default_end_game_turn_ms())]
    pub end_game_turn_ms: u64,

    /// Move number after which turns use max_turn_ms
    #[arg(long, default_value_t = default_early_game_moves())]
    pub early_game_moves: u32,

    /// Confidence above which the next turn is shortened
    #[arg(long, default_value_t = default_high_confidence())]
    pub high_confidence: f64,

    /// Confidence below which the next turn is shortened
    #[arg(long, default_value_t = default_low_confidence())]
    pub low_confidence: f64,

    /// Iteration cap in throughput mode before the first measurement
    #[arg(long, default_value_t = default_initial_iterations())]
    pub initial_iterations: u32,

    /// How turn targets become budgets (clock, throughput)
    #[arg(long, default_value_t = default_budget_mode())]
    pub budget_mode: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.ucb_variance.is_nan() || self.ucb_variance <= 0.0 {
            return Err(anyhow!("ucb_variance must be positive"));
        }

        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be greater than 0"));
        }

        if self.initial_iterations == 0 {
            return Err(anyhow!("initial_iterations must be greater than 0"));
        }

        if self.time_check_interval == 0 {
            return Err(anyhow!("time_check_interval must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.low_confidence)
            || !(0.0..=1.0).contains(&self.high_confidence)
        {
            return Err(anyhow!("confidence thresholds must lie in [0, 1]"));
        }

        if self.low_confidence >= self.high_confidence {
            return Err(anyhow!(
                "low_confidence ({}) must be below high_confidence ({})",
                self.low_confidence,
                self.high_confidence
            ));
        }

        parse_budget_mode(&self.budget_mode)?;

        Ok(())
    }

    /// CLI seed, else the configured one.
    pub fn base_seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.selfplay.seed)
    }

    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_ucb_variance(self.ucb_variance)
            .with_max_iterations(self.max_iterations)
            .with_time_check_interval(self.time_check_interval)
    }

    pub fn governor_config(&self) -> Result<GovernorConfig> {
        Ok(GovernorConfig {
            first_turn_ms: self.first_turn_ms,
            fast_turn_ms: self.fast_turn_ms,
            max_turn_ms: self.max_turn_ms,
            end_game_turn_ms: self.end_game_turn_ms,
            early_game_moves: self.early_game_moves,
            high_confidence: self.high_confidence,
            low_confidence: self.low_confidence,
            initial_iterations: self.initial_iterations,
            max_iterations: self.max_iterations,
            budget_mode: parse_budget_mode(&self.budget_mode)?,
        })
    }
}

pub fn parse_budget_mode(value: &str) -> Result<BudgetMode> {
    match value.to_ascii_lowercase().as_str() {
        "clock" => Ok(BudgetMode::Clock),
        "throughput" => Ok(BudgetMode::Throughput),
        other => Err(anyhow!(
            "invalid budget mode '{}', expected clock or throughput",
            other
        )),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn base_config() -> Config {
        Config {
            games: 1,
            seed: Some(42),
            show_board: false,
            log_level: "info".into(),
            ucb_variance: 0.25,
            max_iterations: 300,
            time_check_interval: 50,
            first_turn_ms: 20,
            fast_turn_ms: 20,
            max_turn_ms: 20,
            end_game_turn_ms: 5,
            early_game_moves: 9,
            high_confidence: 0.8,
            low_confidence: 0.3,
            initial_iterations: 300,
            budget_mode: "throughput".into(),
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_rejects_zero_initial_iterations() {
        let mut cfg = base_config();
        cfg.initial_iterations = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("initial_iterations"));
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let mut cfg = base_config();
        cfg.low_confidence = 0.9;
        cfg.high_confidence = 0.2;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("low_confidence"));
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let mut cfg = base_config();
        cfg.high_confidence = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_budget_mode() {
        let mut cfg = base_config();
        cfg.budget_mode = "vibes".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("budget mode"));
    }

    #[test]
    fn budget_mode_parsing_ignores_case() {
        assert_eq!(parse_budget_mode("Clock").unwrap(), BudgetMode::Clock);
        assert_eq!(
            parse_budget_mode("THROUGHPUT").unwrap(),
            BudgetMode::Throughput
        );
    }

    #[test]
    fn builds_engine_configs() {
        let cfg = base_config();
        let mcts = cfg.mcts_config();
        assert_eq!(mcts.max_iterations, 300);
        assert_eq!(mcts.time_check_interval, 50);

        let governor = cfg.governor_config().unwrap();
        assert_eq!(governor.budget_mode, BudgetMode::Throughput);
        assert_eq!(governor.max_iterations, 300);
        assert_eq!(governor.end_game_turn_ms, 5);
    }

    #[test]
    fn cli_overrides_defaults() {
        let cfg = Config::try_parse_from([
            "selfplay",
            "--games",
            "3",
            "--seed",
            "9",
            "--show-board",
            "false",
            "--budget-mode",
            "throughput",
        ])
        .unwrap();
        assert_eq!(cfg.games, 3);
        assert_eq!(cfg.seed, Some(9));
        assert!(!cfg.show_board);
        assert_eq!(cfg.budget_mode, "throughput");
    }
}
