//! Core domain concepts shared across all subdomains.
//!
//! - [`identifiers::IssueId`], [`identifiers::Nick`], [`identifiers::ChannelKey`]
//! - [`error::TriageError`]: errors raised by session transitions

pub mod error;
pub mod identifiers;
