//! Identifiers for the things a triage session talks about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An issue id from the external tracker.
///
/// The session never looks inside an issue; detail text is fetched on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(u64);

impl IssueId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for IssueId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IssueId {
    type Err = String;

    /// Accepts `123` and `#123`; zero is rejected like any non-positive id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        match digits.parse::<u64>() {
            Ok(0) | Err(_) => Err(format!("'{}' is not a valid issue id", s.trim())),
            Ok(id) => Ok(Self(id)),
        }
    }
}

/// A chat handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nick(String);

impl Nick {
    pub fn new(nick: impl Into<String>) -> Self {
        Self(nick.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Nick {
    fn from(nick: &str) -> Self {
        Self::new(nick)
    }
}

/// The channel a session belongs to, qualified by network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelKey {
    pub network: String,
    pub channel: String,
}

impl ChannelKey {
    pub fn new(network: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.channel, self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_id_parse() {
        assert_eq!("42".parse::<IssueId>(), Ok(IssueId::new(42)));
        assert_eq!("#1337".parse::<IssueId>(), Ok(IssueId::new(1337)));
        assert_eq!(" 7 ".parse::<IssueId>(), Ok(IssueId::new(7)));
        assert!("0".parse::<IssueId>().is_err());
        assert!("-3".parse::<IssueId>().is_err());
        assert!("abc".parse::<IssueId>().is_err());
    }

    #[test]
    fn test_channel_key_display() {
        let key = ChannelKey::new("freenode", "#pulp-meeting");
        assert_eq!(key.to_string(), "#pulp-meeting@freenode");
    }
}
