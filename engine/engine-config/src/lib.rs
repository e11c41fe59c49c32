//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared
//! by the engine and the self-play driver.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`NINEBOARD_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! NINEBOARD_<SECTION>_<KEY>=value
//!
//! Examples:
//!     NINEBOARD_COMMON_LOG_LEVEL=debug
//!     NINEBOARD_MCTS_MAX_ITERATIONS=500000
//!     NINEBOARD_GOVERNOR_MAX_TURN_MS=2000
//!     NINEBOARD_GOVERNOR_BUDGET_MODE=throughput
//!     NINEBOARD_SELFPLAY_SEED=7
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
