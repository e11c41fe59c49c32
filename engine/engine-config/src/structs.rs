//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_ucb_variance() -> f64 {
    defaults::ucb_variance()
}
fn d_max_iterations() -> u32 {
    defaults::max_iterations()
}
fn d_time_check_interval() -> u32 {
    defaults::time_check_interval()
}
fn d_first_turn_ms() -> u64 {
    defaults::first_turn_ms()
}
fn d_fast_turn_ms() -> u64 {
    defaults::fast_turn_ms()
}
fn d_max_turn_ms() -> u64 {
    defaults::max_turn_ms()
}
fn d_end_game_turn_ms() -> u64 {
    defaults::end_game_turn_ms()
}
fn d_early_game_moves() -> u32 {
    defaults::early_game_moves()
}
fn d_high_confidence() -> f64 {
    defaults::high_confidence()
}
fn d_low_confidence() -> f64 {
    defaults::low_confidence()
}
fn d_initial_iterations() -> u32 {
    defaults::initial_iterations()
}
fn d_budget_mode() -> String {
    defaults::budget_mode().into()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_show_board() -> bool {
    defaults::show_board()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub governor: GovernorConfig,
    #[serde(default)]
    pub selfplay: SelfplayConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_ucb_variance")]
    pub ucb_variance: f64,
    #[serde(default = "d_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "d_time_check_interval")]
    pub time_check_interval: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            ucb_variance: defaults::ucb_variance(),
            max_iterations: defaults::max_iterations(),
            time_check_interval: defaults::time_check_interval(),
        }
    }
}

/// Per-turn time budgeting
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GovernorConfig {
    #[serde(default = "d_first_turn_ms")]
    pub first_turn_ms: u64,
    #[serde(default = "d_fast_turn_ms")]
    pub fast_turn_ms: u64,
    #[serde(default = "d_max_turn_ms")]
    pub max_turn_ms: u64,
    #[serde(default = "d_end_game_turn_ms")]
    pub end_game_turn_ms: u64,
    #[serde(default = "d_early_game_moves")]
    pub early_game_moves: u32,
    #[serde(default = "d_high_confidence")]
    pub high_confidence: f64,
    #[serde(default = "d_low_confidence")]
    pub low_confidence: f64,
    #[serde(default = "d_initial_iterations")]
    pub initial_iterations: u32,
    /// "clock" or "throughput"
    #[serde(default = "d_budget_mode")]
    pub budget_mode: String,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            first_turn_ms: defaults::first_turn_ms(),
            fast_turn_ms: defaults::fast_turn_ms(),
            max_turn_ms: defaults::max_turn_ms(),
            end_game_turn_ms: defaults::end_game_turn_ms(),
            early_game_moves: defaults::early_game_moves(),
            high_confidence: defaults::high_confidence(),
            low_confidence: defaults::low_confidence(),
            initial_iterations: defaults::initial_iterations(),
            budget_mode: defaults::budget_mode().into(),
        }
    }
}

/// Self-play driver configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelfplayConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_show_board")]
    pub show_board: bool,
    /// Base seed for reproducible games (None = seed from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SelfplayConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            show_board: defaults::show_board(),
            seed: None,
        }
    }
}
