//! Configuration types for the metadata registry console core.

use crate::error::ManageError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every section and field is optional in TOML; missing values take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManageConfig {
    /// Change request construction.
    pub change_request: ChangeRequestConfig,

    /// Metadata auto-refresh planning.
    pub refresh: RefreshConfig,

    /// Global settings.
    pub global: GlobalConfig,
}

impl ManageConfig {
    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::ConfigParse`] for malformed TOML and
    /// [`ManageError::Config`] for invalid values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ManageConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::Io`] when the file cannot be read, plus the
    /// errors of [`ManageConfig::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ManageError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.global.log_filter.trim().is_empty() {
            return Err(ManageError::Config(
                "global.log_filter must not be empty".to_string(),
            ));
        }
        if self.refresh.update_user.trim().is_empty() {
            return Err(ManageError::Config(
                "refresh.update_user must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Change request configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeRequestConfig {
    /// Refuse to build a request for an edit that changes nothing.
    pub reject_unchanged: bool,

    /// Audit note used when the caller gives none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_note: Option<String>,
}

impl Default for ChangeRequestConfig {
    fn default() -> Self {
        Self {
            reject_unchanged: true,
            default_note: None,
        }
    }
}

/// Auto-refresh configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// User recorded on revisions written by the refresh job.
    pub update_user: String,

    /// Revision note stored on refreshed entities.
    pub revision_note: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            update_user: "Metadata reaper".to_string(),
            revision_note: "Metadata updated by auto refresh".to_string(),
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default `tracing` filter directive; `RUST_LOG` overrides it.
    pub log_filter: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}
