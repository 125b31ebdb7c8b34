//! Domain error types

use super::identifiers::{IssueId, Nick};
use thiserror::Error;

/// Errors raised by triage session transitions.
///
/// Every variant is reported back to the channel; none of them are fatal and
/// none of them leave a partially applied transition behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("No quorum, more triagers need to !join to proceed.")]
    NoQuorum { present: usize, required: usize },

    #[error("No action proposed, nothing to accept.")]
    NoProposal,

    #[error("No issue is currently being triaged.")]
    NoCurrentIssue,

    #[error("{0} is not a chair of this triage session.")]
    NotChair(Nick),

    #[error("Issue {0} has already been triaged in this session.")]
    AlreadySeen(IssueId),

    #[error("Invalid priority '{0}'. Valid: low, normal, high, urgent")]
    InvalidPriority(String),

    #[error("Invalid severity '{0}'. Valid: low, medium, high, urgent")]
    InvalidSeverity(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quorum_display_matches_channel_message() {
        let error = TriageError::NoQuorum {
            present: 1,
            required: 2,
        };
        assert_eq!(
            error.to_string(),
            "No quorum, more triagers need to !join to proceed."
        );
    }

    #[test]
    fn test_not_chair_mentions_nick() {
        let error = TriageError::NotChair(Nick::new("bob"));
        assert_eq!(error.to_string(), "bob is not a chair of this triage session.");
    }
}
