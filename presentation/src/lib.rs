//! Presentation layer for triage-bot
//!
//! This crate contains the CLI definition, the console chat transport,
//! and the interactive channel REPL.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChannelRepl;
pub use cli::commands::Cli;
pub use output::console::ConsoleTransport;
