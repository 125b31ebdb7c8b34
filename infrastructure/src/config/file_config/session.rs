//! Session lifetime configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Seconds without commands before a channel's session is dropped
    pub idle_timeout_secs: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 6 * 60 * 60,
        }
    }
}
