//! Default configuration values loaded from config.defaults.toml.
//!
//! The TOML file is embedded at compile time so the binary carries its
//! defaults with it.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    governor: GovernorDefaults,
    selfplay: SelfplayDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    ucb_variance: f64,
    max_iterations: u32,
    time_check_interval: u32,
}

#[derive(Debug, Deserialize)]
struct GovernorDefaults {
    first_turn_ms: u64,
    fast_turn_ms: u64,
    max_turn_ms: u64,
    end_game_turn_ms: u64,
    early_game_moves: u32,
    high_confidence: f64,
    low_confidence: f64,
    initial_iterations: u32,
    budget_mode: String,
}

#[derive(Debug, Deserialize)]
struct SelfplayDefaults {
    games: u32,
    show_board: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn ucb_variance() -> f64 {
    DEFAULTS.mcts.ucb_variance
}
pub fn max_iterations() -> u32 {
    DEFAULTS.mcts.max_iterations
}
pub fn time_check_interval() -> u32 {
    DEFAULTS.mcts.time_check_interval
}

// Governor
pub fn first_turn_ms() -> u64 {
    DEFAULTS.governor.first_turn_ms
}
pub fn fast_turn_ms() -> u64 {
    DEFAULTS.governor.fast_turn_ms
}
pub fn max_turn_ms() -> u64 {
    DEFAULTS.governor.max_turn_ms
}
pub fn end_game_turn_ms() -> u64 {
    DEFAULTS.governor.end_game_turn_ms
}
pub fn early_game_moves() -> u32 {
    DEFAULTS.governor.early_game_moves
}
pub fn high_confidence() -> f64 {
    DEFAULTS.governor.high_confidence
}
pub fn low_confidence() -> f64 {
    DEFAULTS.governor.low_confidence
}
pub fn initial_iterations() -> u32 {
    DEFAULTS.governor.initial_iterations
}
pub fn budget_mode() -> &'static str {
    &DEFAULTS.governor.budget_mode
}

// Self-play
pub fn games() -> u32 {
    DEFAULTS.selfplay.games
}
pub fn show_board() -> bool {
    DEFAULTS.selfplay.show_board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(log_level(), "info");
        assert_eq!(budget_mode(), "clock");
    }

    #[test]
    fn test_mcts_defaults() {
        assert!((ucb_variance() - 0.25).abs() < f64::EPSILON);
        assert_eq!(max_iterations(), 2_000_000);
        assert_eq!(time_check_interval(), 25_000);
    }

    #[test]
    fn test_governor_defaults() {
        assert_eq!(first_turn_ms(), 1000);
        assert_eq!(fast_turn_ms(), 1000);
        assert_eq!(max_turn_ms(), 3500);
        assert_eq!(end_game_turn_ms(), 250);
        assert_eq!(early_game_moves(), 9);
        assert!((high_confidence() - 0.8).abs() < f64::EPSILON);
        assert!((low_confidence() - 0.3).abs() < f64::EPSILON);
        assert_eq!(initial_iterations(), 100_000);
    }

    #[test]
    fn test_selfplay_defaults() {
        assert_eq!(games(), 1);
        assert!(show_board());
    }
}
