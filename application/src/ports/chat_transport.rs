//! Chat transport port
//!
//! The observable output boundary: everything a triage command says goes
//! through here.

use triage_domain::{ChannelKey, Nick};

/// How a reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyOptions {
    /// Send only to the addressed nick instead of the channel
    pub private: bool,
    /// Prefix the reply with the addressed nick (`nick: text`)
    pub prefix_nick: bool,
}

impl ReplyOptions {
    /// Channel reply addressed to the caller
    pub const PUBLIC: ReplyOptions = ReplyOptions {
        private: false,
        prefix_nick: true,
    };

    /// Private message to the caller
    pub const PRIVATE: ReplyOptions = ReplyOptions {
        private: true,
        prefix_nick: false,
    };

    /// Channel line with no addressee (issue details, pings)
    pub const BARE: ReplyOptions = ReplyOptions {
        private: false,
        prefix_nick: false,
    };
}

impl Default for ReplyOptions {
    fn default() -> Self {
        Self::PUBLIC
    }
}

/// Port for talking back to the channel.
///
/// Implementations live in the presentation layer (console, IRC, …).
pub trait ChatTransport: Send + Sync {
    /// Reply to `to` in `channel`
    fn reply(&self, channel: &ChannelKey, to: &Nick, text: &str, options: ReplyOptions);

    /// Report a failed command to `to`
    fn error(&self, channel: &ChannelKey, to: &Nick, text: &str);

    /// Change the channel topic
    fn set_topic(&self, channel: &ChannelKey, text: &str);
}
