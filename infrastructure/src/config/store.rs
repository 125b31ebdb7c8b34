//! [`ConfigStore`] backed by the loaded [`FileConfig`].
//!
//! Runtime changes made through `/config` live in memory only; the file on
//! disk is never rewritten.

use super::file_config::FileConfig;
use std::sync::RwLock;
use triage_application::config::keys::{
    ANNOUNCE, ANNOUNCE_TEXT, IDLE_TIMEOUT_SECS, MEETING_TITLE, QUORUM_COUNT, REPORT_ID, SET_TOPIC,
    default_value,
};
use triage_application::ports::config_store::{
    ConfigAccessError, ConfigStore, ConfigValue, validate_set,
};
use triage_domain::ChannelKey;

pub struct FileConfigStore {
    config: RwLock<FileConfig>,
}

impl FileConfigStore {
    pub fn new(config: FileConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Copy of the current configuration, runtime changes included.
    pub fn snapshot(&self) -> FileConfig {
        self.read(|config| config.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&FileConfig) -> T) -> T {
        match self.config.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn config_get(&self, key: &str) -> Result<ConfigValue, ConfigAccessError> {
        self.read(|config| match key {
            QUORUM_COUNT => Ok(ConfigValue::Integer(config.triage.quorum_count as i64)),
            REPORT_ID => Ok(ConfigValue::Integer(config.triage.report_id as i64)),
            SET_TOPIC => Ok(ConfigValue::Boolean(config.triage.set_topic)),
            MEETING_TITLE => Ok(ConfigValue::String(config.triage.meeting_title.clone())),
            IDLE_TIMEOUT_SECS => Ok(ConfigValue::Integer(
                config.session.idle_timeout_secs as i64,
            )),
            ANNOUNCE | ANNOUNCE_TEXT => Ok(default_value(key)),
            _ => Err(ConfigAccessError::UnknownKey {
                key: key.to_string(),
            }),
        })
    }

    fn config_get_for_channel(
        &self,
        channel: &ChannelKey,
        key: &str,
    ) -> Result<ConfigValue, ConfigAccessError> {
        let value = self.read(|config| {
            let settings = config.channel(&channel.channel)?;
            match key {
                ANNOUNCE => Some(ConfigValue::Boolean(settings.announce)),
                ANNOUNCE_TEXT => Some(ConfigValue::String(settings.announce_text.clone())),
                _ => None,
            }
        });
        match value {
            Some(value) => Ok(value),
            None => self.config_get(key),
        }
    }

    fn config_set(&self, key: &str, value: ConfigValue) -> Result<(), ConfigAccessError> {
        validate_set(key, &value)?;

        let mut config = match self.config.write() {
            Ok(config) => config,
            Err(poisoned) => poisoned.into_inner(),
        };
        match (key, value) {
            (QUORUM_COUNT, ConfigValue::Integer(n)) => config.triage.quorum_count = n as usize,
            (REPORT_ID, ConfigValue::Integer(n)) => config.triage.report_id = n as u64,
            (SET_TOPIC, ConfigValue::Boolean(b)) => config.triage.set_topic = b,
            _ => {
                return Err(ConfigAccessError::ReadOnly {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
