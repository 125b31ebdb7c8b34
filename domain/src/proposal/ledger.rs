//! Proposal ledger: zero or one live proposal.

use super::kind::{Priority, ProposalKind, Severity};
use serde::{Deserialize, Serialize};

/// A pending suggestion for the current issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub kind: ProposalKind,
    /// Human-readable description, recorded verbatim in the minutes on accept
    pub description: String,
}

impl Proposal {
    pub fn new(kind: ProposalKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn triage(priority: Priority, severity: Severity, target_release: Option<&str>) -> Self {
        let mut description = format!("Priority: {}, Severity {}", priority, severity);
        if let Some(release) = target_release.filter(|r| !r.trim().is_empty()) {
            description.push_str(&format!(" Target Platform Release: {}", release.trim()));
        }
        Self::new(ProposalKind::Triage, description)
    }

    pub fn accept() -> Self {
        Self::new(
            ProposalKind::Accept,
            "Leave the issue as-is, accepting its current state.",
        )
    }

    pub fn defer() -> Self {
        Self::new(ProposalKind::Defer, "Defer this issue until later in triage.")
    }

    pub fn skip() -> Self {
        Self::new(ProposalKind::Skip, "Skip this issue for this triage session.")
    }

    pub fn need_info() -> Self {
        Self::new(
            ProposalKind::NeedInfo,
            "This issue cannot be triaged without more info.",
        )
    }
}

/// Holds the live proposal, if any. Overwritten proposals leave no trace.
#[derive(Debug, Clone, Default)]
pub struct ProposalLedger {
    live: Option<Proposal>,
}

impl ProposalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is live.
    pub fn set(&mut self, proposal: Proposal) -> &Proposal {
        self.live.insert(proposal)
    }

    /// Remove and return the live proposal.
    pub fn take_if_present(&mut self) -> Option<Proposal> {
        self.live.take()
    }

    pub fn current(&self) -> Option<&Proposal> {
        self.live.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_none()
    }

    pub fn clear(&mut self) {
        self.live = None;
    }
}
