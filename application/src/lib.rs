//! Application layer for triage-bot
//!
//! This crate contains the triage use cases, port definitions, and the
//! config key registry. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{TriageSettings, idle_timeout};
pub use ports::{
    chat_transport::{ChatTransport, ReplyOptions},
    config_store::{ConfigAccessError, ConfigStore, ConfigValue, InMemoryConfigStore},
    issue_tracker::{IssueTracker, TrackerError},
    minutes_logger::{MinutesEntry, MinutesKind, MinutesLogger, NoMinutesLogger},
};
pub use use_cases::command::{
    CommandParseError, CommandSpec, ProposeCommand, TriageCommand, command_specs, parse_command,
};
pub use use_cases::session_registry::{SessionRegistry, SharedSession};
pub use use_cases::triage_controller::{CommandContext, ControllerError, TriageController};
