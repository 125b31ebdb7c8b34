//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; every section falls back to its defaults.

mod channels;
mod minutes;
mod redmine;
mod session;
mod triage;

pub use channels::FileChannelConfig;
pub use minutes::FileMinutesConfig;
pub use redmine::FileRedmineConfig;
pub use session::FileSessionConfig;
pub use triage::{DEFAULT_REPORT_ID, FileTriageConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Problems found by [`FileConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("redmine.url cannot be empty")]
    EmptyRedmineUrl,

    #[error("redmine.url must start with http:// or https://, got '{0}'")]
    InvalidRedmineUrl(String),

    #[error("redmine.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("channel name cannot be empty")]
    EmptyChannelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Meeting settings
    pub triage: FileTriageConfig,
    /// Issue tracker connection
    pub redmine: FileRedmineConfig,
    /// Session lifetime
    pub session: FileSessionConfig,
    /// Minutes output
    pub minutes: FileMinutesConfig,
    /// Per-channel settings keyed by channel name
    pub channels: BTreeMap<String, FileChannelConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let url = self.redmine.url.trim();
        if url.is_empty() {
            issues.push(ConfigValidationError::EmptyRedmineUrl);
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigValidationError::InvalidRedmineUrl(url.to_string()));
        }

        if self.redmine.timeout_secs == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }

        if self.channels.keys().any(|name| name.trim().is_empty()) {
            issues.push(ConfigValidationError::EmptyChannelName);
        }

        issues
    }

    /// Settings for `channel`, if it has a table.
    pub fn channel(&self, channel: &str) -> Option<&FileChannelConfig> {
        self.channels.get(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r##"
[triage]
quorum_count = 3
report_id = 200
set_topic = false

[redmine]
url = "https://redmine.example.org"
api_key = "secret"
timeout_secs = 10

[session]
idle_timeout_secs = 600

[minutes]
dir = "/tmp/minutes"

[channels."#pulp-meeting"]
announce = true
announce_text = "Triage in 10 minutes"
"##;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.triage.quorum_count, 3);
        assert_eq!(config.triage.report_id, 200);
        assert!(!config.triage.set_topic);
        assert_eq!(config.triage.meeting_title, "Pulp Triage");
        assert_eq!(config.redmine.url, "https://redmine.example.org");
        assert_eq!(config.redmine.api_key.as_deref(), Some("secret"));
        assert_eq!(config.redmine.timeout_secs, 10);
        assert_eq!(config.session.idle_timeout_secs, 600);
        assert_eq!(config.minutes.dir.as_deref(), Some("/tmp/minutes"));

        let channel = config.channel("#pulp-meeting").unwrap();
        assert!(channel.announce);
        assert_eq!(channel.announce_text, "Triage in 10 minutes");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[triage]
report_id = 7
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.triage.report_id, 7);
        // Defaults should apply
        assert_eq!(config.triage.quorum_count, 2);
        assert!(config.triage.set_topic);
        assert_eq!(config.redmine.timeout_secs, 30);
        assert!(config.channels.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.triage.quorum_count, 2);
        assert_eq!(config.triage.report_id, DEFAULT_REPORT_ID);
        assert_eq!(config.session.idle_timeout_secs, 21600);
        assert!(config.minutes.dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.redmine.url = "  ".to_string();
        config.redmine.timeout_secs = 0;

        assert_eq!(
            config.validate(),
            vec![
                ConfigValidationError::EmptyRedmineUrl,
                ConfigValidationError::InvalidTimeout
            ]
        );
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = FileConfig::default();
        config.redmine.url = "pulp.plan.io".to_string();

        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::InvalidRedmineUrl(
                "pulp.plan.io".to_string()
            )]
        );
    }
}
