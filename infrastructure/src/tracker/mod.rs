//! Issue tracker adapters.
//!
//! Provides infrastructure implementations of the
//! [`IssueTracker`](triage_application::IssueTracker) port.

mod redmine;

pub use redmine::RedmineIssueTracker;
