//! Typed snapshot of the settings a command needs.

use super::keys::{
    ANNOUNCE, ANNOUNCE_TEXT, IDLE_TIMEOUT_SECS, MEETING_TITLE, QUORUM_COUNT, REPORT_ID, SET_TOPIC,
    default_value,
};
use crate::ports::config_store::{ConfigStore, ConfigValue};
use std::time::Duration;
use tracing::warn;
use triage_domain::{ChannelKey, QuorumGate};

/// Settings read from the [`ConfigStore`] at the start of each command.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageSettings {
    pub quorum: QuorumGate,
    pub report_id: u64,
    pub set_topic: bool,
    pub meeting_title: String,
    pub announce: bool,
    pub announce_text: String,
}

impl TriageSettings {
    /// Read settings as seen from `channel`.
    ///
    /// Missing or mistyped values fall back to the built-in defaults.
    pub fn load(store: &dyn ConfigStore, channel: &ChannelKey) -> Self {
        let get = |key: &str| match store.config_get_for_channel(channel, key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Falling back to default for {}: {}", key, e);
                default_value(key)
            }
        };

        Self {
            quorum: QuorumGate::new(non_negative(QUORUM_COUNT, &get(QUORUM_COUNT)) as usize),
            report_id: non_negative(REPORT_ID, &get(REPORT_ID)),
            set_topic: boolean(SET_TOPIC, &get(SET_TOPIC)),
            meeting_title: string(MEETING_TITLE, &get(MEETING_TITLE)),
            announce: boolean(ANNOUNCE, &get(ANNOUNCE)),
            announce_text: string(ANNOUNCE_TEXT, &get(ANNOUNCE_TEXT)),
        }
    }
}

/// How long a session may sit idle before the registry drops it.
pub fn idle_timeout(store: &dyn ConfigStore) -> Duration {
    let value = store
        .config_get(IDLE_TIMEOUT_SECS)
        .unwrap_or_else(|_| default_value(IDLE_TIMEOUT_SECS));
    Duration::from_secs(non_negative(IDLE_TIMEOUT_SECS, &value))
}

fn non_negative(key: &str, value: &ConfigValue) -> u64 {
    match value.as_integer() {
        Some(n) if n >= 0 => n as u64,
        _ => {
            warn!("{} must be a non-negative integer, got '{}'", key, value);
            default_value(key).as_integer().unwrap_or(0) as u64
        }
    }
}

fn boolean(key: &str, value: &ConfigValue) -> bool {
    value.as_bool().unwrap_or_else(|| {
        warn!("{} must be true or false, got '{}'", key, value);
        default_value(key).as_bool().unwrap_or(false)
    })
}

fn string(key: &str, value: &ConfigValue) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => {
            warn!("{} must be a string, got '{}'", key, value);
            default_value(key).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::config_store::InMemoryConfigStore;

    #[test]
    fn test_load_defaults() {
        let store = InMemoryConfigStore::new();
        let settings = TriageSettings::load(&store, &ChannelKey::new("net", "#triage"));
        assert_eq!(settings.quorum.required(), 2);
        assert_eq!(settings.report_id, 134);
        assert!(settings.set_topic);
        assert!(!settings.announce);
        assert!(settings.announce_text.is_empty());
    }

    #[test]
    fn test_load_channel_override() {
        let store = InMemoryConfigStore::new();
        let channel = ChannelKey::new("net", "#triage");
        store.set_for_channel(&channel, ANNOUNCE, ConfigValue::Boolean(true));
        store.set_for_channel(
            &channel,
            ANNOUNCE_TEXT,
            ConfigValue::String("Triage in 10 minutes".into()),
        );

        let settings = TriageSettings::load(&store, &channel);
        assert!(settings.announce);
        assert_eq!(settings.announce_text, "Triage in 10 minutes");
    }

    #[test]
    fn test_mistyped_channel_value_falls_back() {
        let store = InMemoryConfigStore::new();
        let channel = ChannelKey::new("net", "#triage");
        store.set_for_channel(&channel, ANNOUNCE, ConfigValue::String("maybe".into()));
        assert!(!TriageSettings::load(&store, &channel).announce);
    }

    #[test]
    fn test_idle_timeout_default() {
        let store = InMemoryConfigStore::new();
        assert_eq!(idle_timeout(&store), Duration::from_secs(21600));
    }
}
