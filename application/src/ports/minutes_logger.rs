//! Port for meeting minutes.
//!
//! Defines the [`MinutesLogger`] trait used to record what happened during a
//! triage meeting, in the vocabulary of meetbot-style minutes (`#action`,
//! `#agreed`, …).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! diagnostics for operators, while minutes are the meeting's public record.

use triage_domain::{ChannelKey, Nick};

/// Kind of minutes entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinutesKind {
    StartMeeting,
    EndMeeting,
    Action,
    Info,
    Agreed,
    Idea,
    Help,
    NewChair,
    Topic,
}

impl MinutesKind {
    /// Meetbot command for this kind
    pub fn command(&self) -> &'static str {
        match self {
            MinutesKind::StartMeeting => "#startmeeting",
            MinutesKind::EndMeeting => "#endmeeting",
            MinutesKind::Action => "#action",
            MinutesKind::Info => "#info",
            MinutesKind::Agreed => "#agreed",
            MinutesKind::Idea => "#idea",
            MinutesKind::Help => "#help",
            MinutesKind::NewChair => "#chair",
            MinutesKind::Topic => "#topic",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.command().trim_start_matches('#')
    }
}

/// One line of the minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinutesEntry {
    pub kind: MinutesKind,
    /// Who caused the entry
    pub nick: Nick,
    pub text: String,
}

impl MinutesEntry {
    pub fn new(kind: MinutesKind, nick: Nick, text: impl Into<String>) -> Self {
        Self {
            kind,
            nick,
            text: text.into(),
        }
    }

    /// The entry as a meetbot command line, e.g. `#agreed Skip this issue`.
    pub fn line(&self) -> String {
        if self.text.is_empty() {
            self.kind.command().to_string()
        } else {
            format!("{} {}", self.kind.command(), self.text)
        }
    }
}

/// Port for recording meeting minutes.
///
/// Fire-and-forget: `record` is synchronous and non-fallible so a broken
/// minutes sink never interrupts a meeting. Implementations swallow their
/// own failures.
pub trait MinutesLogger: Send + Sync {
    fn record(&self, channel: &ChannelKey, entry: MinutesEntry);
}

/// No-op implementation for tests and when minutes are disabled.
pub struct NoMinutesLogger;

impl MinutesLogger for NoMinutesLogger {
    fn record(&self, _channel: &ChannelKey, _entry: MinutesEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_line() {
        let entry = MinutesEntry::new(MinutesKind::Agreed, Nick::new("alice"), "Skip it");
        assert_eq!(entry.line(), "#agreed Skip it");

        let bare = MinutesEntry::new(MinutesKind::EndMeeting, Nick::new("alice"), "");
        assert_eq!(bare.line(), "#endmeeting");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MinutesKind::NewChair.as_str(), "chair");
        assert_eq!(MinutesKind::StartMeeting.as_str(), "startmeeting");
    }
}
