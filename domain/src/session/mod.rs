//! Triage session domain.
//!
//! - [`aggregate::TriageSession`]: the aggregate root owning participants,
//!   the issue under discussion, seen/deferred sets, carers and the proposal ledger
//! - [`outcome`]: non-error results of session transitions

pub mod aggregate;
pub mod outcome;
