//! Infrastructure layer for triage-bot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Redmine tracker client, the JSONL
//! minutes writer, and configuration file loading.

pub mod config;
pub mod minutes;
pub mod tracker;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChannelConfig, FileConfig, FileConfigStore,
    FileMinutesConfig, FileRedmineConfig, FileSessionConfig, FileTriageConfig,
};
pub use minutes::JsonlMinutesLogger;
pub use tracker::RedmineIssueTracker;
