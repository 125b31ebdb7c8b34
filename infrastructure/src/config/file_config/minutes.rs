//! Minutes configuration from TOML (`[minutes]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw minutes configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMinutesConfig {
    /// Directory for JSONL minutes; minutes are not written when unset
    pub dir: Option<String>,
}

impl FileMinutesConfig {
    /// Minutes directory with a leading `~` expanded.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?.trim();
        if dir.is_empty() {
            return None;
        }
        match dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(dir)),
        }
    }
}
