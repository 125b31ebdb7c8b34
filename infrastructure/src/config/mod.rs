//! Configuration file loading for triage-bot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIAGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./triage.toml` or `./.triage.toml`
//! 4. Global: `$XDG_CONFIG_HOME/triage-bot/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod store;

pub use file_config::{
    ConfigValidationError, DEFAULT_REPORT_ID, FileChannelConfig, FileConfig, FileMinutesConfig,
    FileRedmineConfig, FileSessionConfig, FileTriageConfig,
};
pub use loader::ConfigLoader;
pub use store::FileConfigStore;
