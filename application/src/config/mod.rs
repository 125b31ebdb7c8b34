//! Application-level configuration.
//!
//! - [`keys`]: registry of known config keys and their defaults
//! - [`TriageSettings`]: typed view of the keys a command reads

pub mod keys;
pub mod settings;

pub use settings::{TriageSettings, idle_timeout};
