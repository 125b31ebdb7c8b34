//! Proposals
//!
//! A proposal is a pending, unvoted suggestion for resolving the current
//! issue. At most one is live; the last one made wins.

pub mod kind;
pub mod ledger;

pub use kind::{Priority, ProposalKind, Resolution, Severity};
pub use ledger::{Proposal, ProposalLedger};
