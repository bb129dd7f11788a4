// crates/kafka-env-config/src/settings.rs
// ============================================================================
// Module: Settings Sources
// Description: Named key/value settings consumed by the config assembler.
// Purpose: Decouple validation from the process environment.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The assembler reads settings through the [`SettingsSource`] trait rather
//! than from the process environment directly. [`EnvSettings`] reads the
//! environment, [`MapSettings`] holds values in memory, and [`FileSettings`]
//! loads a flat TOML table from disk.
//!
//! Setting names follow [`setting_name`]: `KAFKA_<ATTR>` for the default
//! instance and `HEROKU_KAFKA_<NAME>_<ATTR>` for a named one.
//! Security posture: settings carry private key material and must never be
//! logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attribute holding the comma-separated broker locators.
pub const URL_ATTRIBUTE: &str = "URL";
/// Attribute holding the topic/group namespace prefix.
pub const PREFIX_ATTRIBUTE: &str = "PREFIX";
/// Attribute holding the client certificate PEM.
pub const CLIENT_CERT_ATTRIBUTE: &str = "CLIENT_CERT";
/// Attribute holding the client private key PEM.
pub const CLIENT_CERT_KEY_ATTRIBUTE: &str = "CLIENT_CERT_KEY";
/// Attribute holding the trusted CA certificate PEM.
pub const TRUSTED_CERT_ATTRIBUTE: &str = "TRUSTED_CERT";

/// Setting prefix for the default (unnamed) instance.
const DEFAULT_INSTANCE_PREFIX: &str = "KAFKA";
/// Setting prefix for named instances.
const NAMED_INSTANCE_PREFIX: &str = "HEROKU_KAFKA_";
/// Maximum settings file size in bytes.
pub(crate) const MAX_SETTINGS_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Setting Names
// ============================================================================

/// Returns the setting name for `attribute` on the given instance.
///
/// A missing or blank instance selects the default `KAFKA_` settings. The
/// result is always upper-cased.
#[must_use]
pub fn setting_name(instance: Option<&str>, attribute: &str) -> String {
    let prefix = match instance {
        Some(name) if !name.trim().is_empty() => format!("{NAMED_INSTANCE_PREFIX}{name}"),
        _ => DEFAULT_INSTANCE_PREFIX.to_string(),
    };
    format!("{prefix}_{attribute}").to_uppercase()
}

// ============================================================================
// SECTION: Settings Source
// ============================================================================

/// Read-only source of named settings.
pub trait SettingsSource: Send + Sync {
    /// Returns the raw value of `name`, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Returns the value of `name`, treating an empty value as unset.
    fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty())
    }
}

/// Settings backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// In-memory settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MapSettings {
    /// Setting values keyed by name.
    values: BTreeMap<String, String>,
}

impl MapSettings {
    /// Creates an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes `name`.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl SettingsSource for MapSettings {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapSettings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect(),
        }
    }
}

// ============================================================================
// SECTION: File Settings
// ============================================================================

/// Settings loaded from a flat TOML table of string values.
///
/// ```toml
/// KAFKA_URL = "kafka+ssl://broker-1:9096"
/// KAFKA_PREFIX = "tenant-1."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    /// Parsed settings.
    values: MapSettings,
}

impl FileSettings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be read, exceeds the
    /// size limit, is not UTF-8, or is not a table of strings.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let bytes = fs::read(path).map_err(|err| SettingsError::Io(err.to_string()))?;
        if bytes.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(SettingsError::Invalid("settings file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| SettingsError::Invalid("settings file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] when the text is not a table of
    /// string values.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let values: MapSettings =
            toml::from_str(content).map_err(|err| SettingsError::Parse(err.to_string()))?;
        Ok(Self {
            values,
        })
    }
}

impl SettingsSource for FileSettings {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name)
    }
}

/// Errors emitted while loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure while reading the file.
    #[error("settings io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("settings parse error: {0}")]
    Parse(String),
    /// File content violates a loading limit.
    #[error("invalid settings: {0}")]
    Invalid(String),
}
