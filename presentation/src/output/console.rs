//! Console chat transport
//!
//! Renders everything the bot says as terminal lines, one per reply.

use colored::Colorize;
use triage_application::ports::chat_transport::{ChatTransport, ReplyOptions};
use triage_domain::{ChannelKey, Nick};

/// [`ChatTransport`] printing to stdout (errors to stderr).
pub struct ConsoleTransport {
    color: bool,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Disable colored output.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Plain text of a reply, before coloring.
    pub fn render_reply(channel: &ChannelKey, to: &Nick, text: &str, options: ReplyOptions) -> String {
        if options.private {
            format!("[private -> {}] {}", to, text)
        } else if options.prefix_nick {
            format!("[{}] {}: {}", channel.channel, to, text)
        } else {
            format!("[{}] {}", channel.channel, text)
        }
    }

    pub fn render_error(channel: &ChannelKey, to: &Nick, text: &str) -> String {
        format!("[{}] {}: Error: {}", channel.channel, to, text)
    }

    pub fn render_topic(channel: &ChannelKey, text: &str) -> String {
        format!("* Topic for {} is now: {}", channel.channel, text)
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTransport for ConsoleTransport {
    fn reply(&self, channel: &ChannelKey, to: &Nick, text: &str, options: ReplyOptions) {
        let line = Self::render_reply(channel, to, text, options);
        if !self.color {
            println!("{}", line);
        } else if options.private {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line.cyan());
        }
    }

    fn error(&self, channel: &ChannelKey, to: &Nick, text: &str) {
        let line = Self::render_error(channel, to, text);
        if self.color {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{}", line);
        }
    }

    fn set_topic(&self, channel: &ChannelKey, text: &str) {
        let line = Self::render_topic(channel, text);
        if self.color {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> ChannelKey {
        ChannelKey::new("local", "#pulp-meeting")
    }

    #[test]
    fn test_render_reply_variants() {
        let alice = Nick::new("alice");

        assert_eq!(
            ConsoleTransport::render_reply(&channel(), &alice, "Proposed - x", ReplyOptions::PUBLIC),
            "[#pulp-meeting] alice: Proposed - x"
        );
        assert_eq!(
            ConsoleTransport::render_reply(&channel(), &alice, "Issue #1", ReplyOptions::BARE),
            "[#pulp-meeting] Issue #1"
        );
        assert_eq!(
            ConsoleTransport::render_reply(&channel(), &alice, "hi", ReplyOptions::PRIVATE),
            "[private -> alice] hi"
        );
    }

    #[test]
    fn test_render_error_and_topic() {
        assert_eq!(
            ConsoleTransport::render_error(&channel(), &Nick::new("bob"), "No quorum"),
            "[#pulp-meeting] bob: Error: No quorum"
        );
        assert_eq!(
            ConsoleTransport::render_topic(&channel(), "https://pulp.plan.io/issues/1"),
            "* Topic for #pulp-meeting is now: https://pulp.plan.io/issues/1"
        );
    }
}
