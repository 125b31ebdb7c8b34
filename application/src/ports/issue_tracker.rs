//! Issue tracker port.
//!
//! Read-only access to the external tracker: the ordered issue list of a saved
//! report, and human-readable detail lines for a single issue. Infrastructure
//! adapters implement this (e.g. Redmine over HTTP).

use async_trait::async_trait;
use thiserror::Error;
use triage_domain::{IssueId, IssueQueue};

/// Errors that can occur while talking to the tracker.
///
/// Surfaced to the channel as-is. Nothing retries automatically; users
/// re-issue the command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The tracker could not be reached or answered with a failure status
    #[error("Unable to reach the issue tracker: {0}")]
    Unavailable(String),

    /// The tracker answered, but not with the data we expected
    #[error("Unable to fetch issues list from the issue tracker: {0}")]
    Malformed(String),

    /// The requested issue does not exist
    #[error("Issue {0} was not found in the issue tracker")]
    NotFound(IssueId),
}

/// Port for reading from the issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch the ordered issue ids of a saved report.
    ///
    /// The returned queue is fully materialised and can be scanned any number
    /// of times.
    async fn report_issues(&self, report_id: u64) -> Result<IssueQueue, TrackerError>;

    /// Fetch detail lines for one issue.
    ///
    /// The first line is a one-line summary. A second line, when present, is
    /// suitable as a channel topic.
    async fn issue_detail(&self, issue: IssueId) -> Result<Vec<String>, TrackerError>;
}
