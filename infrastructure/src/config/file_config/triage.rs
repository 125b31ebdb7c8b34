//! Meeting configuration from TOML (`[triage]` section)

use serde::{Deserialize, Serialize};
use triage_domain::DEFAULT_QUORUM_COUNT;

/// Saved Redmine query listing untriaged Pulp issues.
pub const DEFAULT_REPORT_ID: u64 = 134;

/// Raw meeting configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTriageConfig {
    /// Triagers required before the queue can advance
    pub quorum_count: usize,
    /// Saved tracker report listing the untriaged issues
    pub report_id: u64,
    /// Set the channel topic when an issue comes up
    pub set_topic: bool,
    /// Title recorded in the minutes when a meeting starts
    pub meeting_title: String,
}

impl Default for FileTriageConfig {
    fn default() -> Self {
        Self {
            quorum_count: DEFAULT_QUORUM_COUNT,
            report_id: DEFAULT_REPORT_ID,
            set_topic: true,
            meeting_title: "Pulp Triage".to_string(),
        }
    }
}
