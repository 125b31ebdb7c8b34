//! Runtime configuration access port.
//!
//! Provides a uniform interface for reading (and, for mutable keys, writing)
//! configuration at runtime. Triage commands read through this port on every
//! invocation so that changes such as a raised quorum apply immediately.

use crate::config::keys::{KeyScope, Mutability, default_value, known_keys, lookup_key};
use std::collections::HashMap;
use std::sync::RwLock;
use triage_domain::ChannelKey;

/// A dynamically-typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl ConfigValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parse user input into the same variant as `like`.
    pub fn parse_like(like: &ConfigValue, raw: &str) -> Option<ConfigValue> {
        match like {
            ConfigValue::String(_) => Some(ConfigValue::String(raw.to_string())),
            ConfigValue::Integer(_) => raw.trim().parse().ok().map(ConfigValue::Integer),
            ConfigValue::Boolean(_) => match raw.trim().to_lowercase().as_str() {
                "true" | "on" | "yes" => Some(ConfigValue::Boolean(true)),
                "false" | "off" | "no" => Some(ConfigValue::Boolean(false)),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Errors from config access operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAccessError {
    /// The key is not recognized.
    UnknownKey { key: String },
    /// The key exists but cannot be changed at runtime.
    ReadOnly { key: String },
    /// The provided value is invalid for this key.
    InvalidValue { key: String, message: String },
}

impl std::fmt::Display for ConfigAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigAccessError::UnknownKey { key } => write!(f, "unknown config key: {}", key),
            ConfigAccessError::ReadOnly { key } => {
                write!(f, "config key '{}' is read-only", key)
            }
            ConfigAccessError::InvalidValue { key, message } => {
                write!(f, "invalid value for '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigAccessError {}

/// Port for runtime config access.
///
/// `config_set` takes `&self`: stores are shared behind `Arc` between the
/// controller and the REPL, so implementations use interior mutability.
pub trait ConfigStore: Send + Sync {
    /// Get the current value of a config key.
    fn config_get(&self, key: &str) -> Result<ConfigValue, ConfigAccessError>;

    /// Get a value as seen from `channel`.
    ///
    /// Channel-scoped keys may be overridden per channel; the default
    /// implementation ignores the channel.
    fn config_get_for_channel(
        &self,
        _channel: &ChannelKey,
        key: &str,
    ) -> Result<ConfigValue, ConfigAccessError> {
        self.config_get(key)
    }

    /// Set a mutable, global config key.
    fn config_set(&self, key: &str, value: ConfigValue) -> Result<(), ConfigAccessError>;

    /// List all known config key names.
    fn config_keys(&self) -> Vec<String> {
        known_keys().iter().map(|k| k.key.to_string()).collect()
    }
}

/// Check that `key` may be set to `value` at runtime.
pub fn validate_set(key: &str, value: &ConfigValue) -> Result<(), ConfigAccessError> {
    let info = lookup_key(key).ok_or_else(|| ConfigAccessError::UnknownKey {
        key: key.to_string(),
    })?;
    if info.mutability == Mutability::ReadOnly || info.scope == KeyScope::Channel {
        return Err(ConfigAccessError::ReadOnly {
            key: key.to_string(),
        });
    }
    let expected = default_value(info.key);
    if std::mem::discriminant(&expected) != std::mem::discriminant(value) {
        return Err(ConfigAccessError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a value like '{}'", expected),
        });
    }
    if let ConfigValue::Integer(n) = value
        && *n < 0
    {
        return Err(ConfigAccessError::InvalidValue {
            key: key.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(())
}

/// Config store held entirely in memory, seeded with the defaults.
///
/// Used by tests and by embedders that have no config file.
#[derive(Default)]
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<String, ConfigValue>>,
    channel_values: RwLock<HashMap<(String, String), ConfigValue>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a channel-scoped key for one channel.
    pub fn set_for_channel(&self, channel: &ChannelKey, key: &str, value: ConfigValue) {
        if let Ok(mut values) = self.channel_values.write() {
            values.insert((channel.channel.clone(), key.to_string()), value);
        }
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn config_get(&self, key: &str) -> Result<ConfigValue, ConfigAccessError> {
        let info = lookup_key(key).ok_or_else(|| ConfigAccessError::UnknownKey {
            key: key.to_string(),
        })?;
        let stored = self
            .values
            .read()
            .ok()
            .and_then(|values| values.get(info.key).cloned());
        Ok(stored.unwrap_or_else(|| default_value(info.key)))
    }

    fn config_get_for_channel(
        &self,
        channel: &ChannelKey,
        key: &str,
    ) -> Result<ConfigValue, ConfigAccessError> {
        let stored = self.channel_values.read().ok().and_then(|values| {
            values
                .get(&(channel.channel.clone(), key.to_string()))
                .cloned()
        });
        match stored {
            Some(value) => Ok(value),
            None => self.config_get(key),
        }
    }

    fn config_set(&self, key: &str, value: ConfigValue) -> Result<(), ConfigAccessError> {
        validate_set(key, &value)?;
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value);
        }
        Ok(())
    }
}
