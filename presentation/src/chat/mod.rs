//! Interactive channel module
//!
//! Provides a readline-based stand-in for a chat channel: every line typed is
//! a message from some nick, handed to the triage controller.

mod input;
mod repl;

pub use input::{MetaCommand, ReplInput, parse_input};
pub use repl::ChannelRepl;
