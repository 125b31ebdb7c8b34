//! Domain layer for triage-bot
//!
//! This crate contains the triage session state machine and its value types.
//! It has no dependencies on infrastructure or presentation concerns, and
//! performs no I/O: the tracker list is always handed in by the caller.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A [`TriageSession`] is one running meeting, from `start` to `end`. It owns
//! the triagers and chairs, the issue under discussion, the seen and deferred
//! sets, the carer registry and the proposal ledger.
//!
//! ## Queue
//!
//! Each advance orders the freshly fetched tracker list into issues nobody has
//! looked at yet, followed by deferred issues ([`build_candidates`]).
//!
//! ## Quorum
//!
//! The queue only moves while at least [`QuorumGate::required`] triagers are present.

pub mod core;
pub mod proposal;
pub mod queue;
pub mod quorum;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    error::TriageError,
    identifiers::{ChannelKey, IssueId, Nick},
};
pub use proposal::{Priority, Proposal, ProposalKind, ProposalLedger, Resolution, Severity};
pub use queue::{IssueQueue, build_candidates};
pub use quorum::{DEFAULT_QUORUM_COUNT, QuorumGate, quorum_met};
pub use session::{
    aggregate::TriageSession,
    outcome::{AcceptOutcome, AcceptTransition, AdvanceOutcome, JoinOutcome, SessionPhase},
};
