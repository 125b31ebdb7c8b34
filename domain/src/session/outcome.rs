//! Results of session transitions that are not errors.

use crate::core::identifiers::IssueId;
use crate::proposal::Proposal;

/// Session-level lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Active,
}

/// Result of `join`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// Result of moving the queue forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// `issue` is now under discussion; `remaining` counts it and everything behind it
    Advanced { issue: IssueId, remaining: usize },
    /// Nothing left; no issue is under discussion
    QueueExhausted,
}

impl AdvanceOutcome {
    pub fn issue(&self) -> Option<IssueId> {
        match self {
            AdvanceOutcome::Advanced { issue, .. } => Some(*issue),
            AdvanceOutcome::QueueExhausted => None,
        }
    }
}

/// What accepting a proposal did to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptTransition {
    Advanced(AdvanceOutcome),
    Deferred(AdvanceOutcome),
    Recorded,
}

/// Result of `accept`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOutcome {
    pub proposal: Proposal,
    pub transition: AcceptTransition,
}
