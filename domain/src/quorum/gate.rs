//! Quorum gating for queue advancement
//!
//! A triage meeting only moves on to the next issue while enough triagers are
//! present. The threshold comes from configuration and is re-read on every
//! advance, so raising it mid-meeting takes effect immediately.

use serde::{Deserialize, Serialize};

/// Default number of triagers needed to advance.
pub const DEFAULT_QUORUM_COUNT: usize = 2;

/// Returns whether `present` triagers satisfy a quorum of `required`.
///
/// ```
/// use triage_domain::quorum::quorum_met;
///
/// assert!(quorum_met(2, 2));
/// assert!(!quorum_met(1, 2));
/// assert!(quorum_met(0, 0));
/// ```
pub fn quorum_met(present: usize, required: usize) -> bool {
    present >= required
}

/// Configured quorum threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuorumGate {
    required: usize,
}

impl QuorumGate {
    pub fn new(required: usize) -> Self {
        Self { required }
    }

    /// Number of triagers needed to advance
    pub fn required(&self) -> usize {
        self.required
    }

    /// Check the gate against the current triager count
    pub fn is_met(&self, present: usize) -> bool {
        quorum_met(present, self.required)
    }

    /// How many more triagers must join before the gate opens
    pub fn shortfall(&self, present: usize) -> usize {
        self.required.saturating_sub(present)
    }
}

impl Default for QuorumGate {
    fn default() -> Self {
        Self::new(DEFAULT_QUORUM_COUNT)
    }
}

impl std::fmt::Display for QuorumGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "at least {} triagers", self.required)
    }
}
