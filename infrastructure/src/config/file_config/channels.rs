//! Per-channel configuration from TOML (`[channels."<name>"]` tables)

use serde::{Deserialize, Serialize};

/// Raw per-channel configuration from TOML
///
/// ```toml
/// [channels."#pulp-meeting"]
/// announce = true
/// announce_text = "Triage starts in 10 minutes, !here to join"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChannelConfig {
    /// Whether `!announce` posts `announce_text` in this channel
    pub announce: bool,
    pub announce_text: String,
}
