//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by NINEBOARD_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("NINEBOARD_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from NINEBOARD_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "NINEBOARD_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate.
///
/// Values that fail to parse are logged and leave the field untouched.
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={:?}: cannot parse value", $key, raw),
            }
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = Some(v),
                Err(_) => warn!("Ignoring {}={:?}: cannot parse value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: NINEBOARD_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "NINEBOARD_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.ucb_variance,
        "NINEBOARD_MCTS_UCB_VARIANCE",
        parse
    );
    env_override!(
        config,
        mcts.max_iterations,
        "NINEBOARD_MCTS_MAX_ITERATIONS",
        parse
    );
    env_override!(
        config,
        mcts.time_check_interval,
        "NINEBOARD_MCTS_TIME_CHECK_INTERVAL",
        parse
    );

    // Governor
    env_override!(
        config,
        governor.first_turn_ms,
        "NINEBOARD_GOVERNOR_FIRST_TURN_MS",
        parse
    );
    env_override!(
        config,
        governor.fast_turn_ms,
        "NINEBOARD_GOVERNOR_FAST_TURN_MS",
        parse
    );
    env_override!(
        config,
        governor.max_turn_ms,
        "NINEBOARD_GOVERNOR_MAX_TURN_MS",
        parse
    );
    env_override!(
        config,
        governor.end_game_turn_ms,
        "NINEBOARD_GOVERNOR_END_GAME_TURN_MS",
        parse
    );
    env_override!(
        config,
        governor.early_game_moves,
        "NINEBOARD_GOVERNOR_EARLY_GAME_MOVES",
        parse
    );
    env_override!(
        config,
        governor.high_confidence,
        "NINEBOARD_GOVERNOR_HIGH_CONFIDENCE",
        parse
    );
    env_override!(
        config,
        governor.low_confidence,
        "NINEBOARD_GOVERNOR_LOW_CONFIDENCE",
        parse
    );
    env_override!(
        config,
        governor.initial_iterations,
        "NINEBOARD_GOVERNOR_INITIAL_ITERATIONS",
        parse
    );
    env_override!(
        config,
        governor.budget_mode,
        "NINEBOARD_GOVERNOR_BUDGET_MODE"
    );

    // Self-play
    env_override!(config, selfplay.games, "NINEBOARD_SELFPLAY_GAMES", parse);
    env_override!(
        config,
        selfplay.show_board,
        "NINEBOARD_SELFPLAY_SHOW_BOARD",
        parse
    );
    env_override!(
        config,
        selfplay.seed,
        "NINEBOARD_SELFPLAY_SEED",
        optional_parse
    );

    config
}
