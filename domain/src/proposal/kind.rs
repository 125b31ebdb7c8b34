//! Proposal kinds and triage field values

use crate::core::error::TriageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a proposal asks the meeting to do with the current issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalKind {
    /// Set priority/severity (and optionally a target release)
    Triage,
    /// Leave the issue as-is
    Accept,
    /// Push the issue to the end of this session's queue
    Defer,
    /// Move on without a resolution
    Skip,
    /// The issue needs more information before it can be triaged
    NeedInfo,
}

/// Session transition triggered when a proposal is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Mark the current issue seen and move to the next one
    Advance,
    /// Defer the current issue, then move to the next one
    Defer,
    /// Only record the agreement in the minutes
    Record,
}

impl ProposalKind {
    pub const ALL: [ProposalKind; 5] = [
        ProposalKind::Triage,
        ProposalKind::Accept,
        ProposalKind::Defer,
        ProposalKind::Skip,
        ProposalKind::NeedInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalKind::Triage => "triage",
            ProposalKind::Accept => "accept",
            ProposalKind::Defer => "defer",
            ProposalKind::Skip => "skip",
            ProposalKind::NeedInfo => "needinfo",
        }
    }

    /// The tracker is never written to, so triage, accept and skip all end
    /// the same way: the issue is marked seen and the queue advances.
    pub fn resolution(&self) -> Resolution {
        match self {
            ProposalKind::Triage | ProposalKind::Accept | ProposalKind::Skip => {
                Resolution::Advance
            }
            ProposalKind::Defer => Resolution::Defer,
            ProposalKind::NeedInfo => Resolution::Record,
        }
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "triage" => Ok(ProposalKind::Triage),
            "accept" => Ok(ProposalKind::Accept),
            "defer" => Ok(ProposalKind::Defer),
            "skip" => Ok(ProposalKind::Skip),
            "needinfo" => Ok(ProposalKind::NeedInfo),
            _ => Err(format!(
                "Unknown proposal: {}. Valid: triage, accept, defer, skip, needinfo",
                s
            )),
        }
    }
}

/// Issue priority as used by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(TriageError::InvalidPriority(s.to_string())),
        }
    }
}

/// Issue severity as used by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Urgent,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "urgent" => Ok(Severity::Urgent),
            _ => Err(TriageError::InvalidSeverity(s.to_string())),
        }
    }
}
