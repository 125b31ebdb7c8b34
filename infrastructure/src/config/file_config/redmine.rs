//! Redmine configuration from TOML (`[redmine]` section)

use serde::{Deserialize, Serialize};

/// Raw Redmine configuration from TOML
///
/// ```toml
/// [redmine]
/// url = "https://pulp.plan.io"
/// api_key = "..."      # optional; anonymous access when unset
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRedmineConfig {
    pub url: String,
    pub api_key: Option<String>,
    /// Upper bound on every tracker request
    pub timeout_secs: u64,
}

impl Default for FileRedmineConfig {
    fn default() -> Self {
        Self {
            url: "https://pulp.plan.io".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}
