//! Config key registry.
//!
//! Defines metadata for known configuration keys: name, description,
//! mutability, scope and default. Used by [`ConfigStore`](crate::ports::config_store::ConfigStore)
//! implementations and the REPL `/config` command.

use crate::ports::config_store::ConfigValue;

pub const QUORUM_COUNT: &str = "triage.quorum_count";
pub const REPORT_ID: &str = "triage.report_id";
pub const SET_TOPIC: &str = "triage.set_topic";
pub const MEETING_TITLE: &str = "triage.meeting_title";
pub const IDLE_TIMEOUT_SECS: &str = "session.idle_timeout_secs";
pub const ANNOUNCE: &str = "channel.announce";
pub const ANNOUNCE_TEXT: &str = "channel.announce_text";

/// Whether a config key can be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    ReadOnly,
}

/// Whether a key has one value or one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    Global,
    Channel,
}

/// Metadata for a single config key.
#[derive(Debug, Clone)]
pub struct ConfigKeyInfo {
    /// Dotted key path (e.g., `"triage.quorum_count"`).
    pub key: &'static str,
    pub description: &'static str,
    pub mutability: Mutability,
    pub scope: KeyScope,
}

/// All known config keys with their metadata.
pub fn known_keys() -> &'static [ConfigKeyInfo] {
    &KNOWN_KEYS
}

/// Look up a config key by its dotted path.
pub fn lookup_key(key: &str) -> Option<&'static ConfigKeyInfo> {
    KNOWN_KEYS.iter().find(|k| k.key == key)
}

/// Built-in default for a known key. Unknown keys default to an empty string.
pub fn default_value(key: &str) -> ConfigValue {
    match key {
        QUORUM_COUNT => ConfigValue::Integer(2),
        REPORT_ID => ConfigValue::Integer(134),
        SET_TOPIC => ConfigValue::Boolean(true),
        MEETING_TITLE => ConfigValue::String("Pulp Triage".to_string()),
        IDLE_TIMEOUT_SECS => ConfigValue::Integer(6 * 60 * 60),
        ANNOUNCE => ConfigValue::Boolean(false),
        _ => ConfigValue::String(String::new()),
    }
}

static KNOWN_KEYS: [ConfigKeyInfo; 7] = [
    // ==================== Mutable ====================
    ConfigKeyInfo {
        key: QUORUM_COUNT,
        description: "Triagers required before the queue can advance",
        mutability: Mutability::Mutable,
        scope: KeyScope::Global,
    },
    ConfigKeyInfo {
        key: REPORT_ID,
        description: "Tracker report listing the untriaged issues",
        mutability: Mutability::Mutable,
        scope: KeyScope::Global,
    },
    ConfigKeyInfo {
        key: SET_TOPIC,
        description: "Set the channel topic when an issue comes up",
        mutability: Mutability::Mutable,
        scope: KeyScope::Global,
    },
    // ==================== ReadOnly ====================
    ConfigKeyInfo {
        key: MEETING_TITLE,
        description: "Title recorded when a meeting starts",
        mutability: Mutability::ReadOnly,
        scope: KeyScope::Global,
    },
    ConfigKeyInfo {
        key: IDLE_TIMEOUT_SECS,
        description: "Seconds without commands before a session is dropped",
        mutability: Mutability::ReadOnly,
        scope: KeyScope::Global,
    },
    // ==================== Per channel ====================
    ConfigKeyInfo {
        key: ANNOUNCE,
        description: "Whether !announce posts the announcement text",
        mutability: Mutability::ReadOnly,
        scope: KeyScope::Channel,
    },
    ConfigKeyInfo {
        key: ANNOUNCE_TEXT,
        description: "Triage announcement text",
        mutability: Mutability::ReadOnly,
        scope: KeyScope::Channel,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_typed_default() {
        for info in known_keys() {
            let _ = default_value(info.key);
            assert!(lookup_key(info.key).is_some());
        }
        assert_eq!(default_value(ANNOUNCE_TEXT), ConfigValue::String(String::new()));
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup_key("agent.hil_mode").is_none());
    }
}
