//! Quorum gating
//!
//! Pure check of present triagers against the configured threshold. No state
//! beyond its two inputs.

pub mod gate;

pub use gate::{DEFAULT_QUORUM_COUNT, QuorumGate, quorum_met};
