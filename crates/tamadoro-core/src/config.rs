//! TOML-based application configuration.
//!
//! Holds the static reference data a session is built from:
//! - Starting point balance, pet health and greeting
//! - Mood message interval and thresholds
//! - The evolution stage table
//! - The shop catalog
//!
//! Looked up at `<config_dir>/tamadoro/config.toml` (e.g.
//! `~/.config/tamadoro/config.toml`). The file is only ever read; a missing
//! file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::mood::MoodThresholds;
use crate::progression::{EvolutionStage, StageTable};
use crate::shop::{Catalog, ShopItem};

/// Session start-up values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_initial_points")]
    pub initial_points: u32,
    #[serde(default = "default_initial_health")]
    pub initial_health: u8,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Suggested points for a new assignment when none are given.
    #[serde(default = "default_assignment_points")]
    pub default_assignment_points: u32,
    /// Suggested points for a new goal when none are given.
    #[serde(default = "default_goal_points")]
    pub default_goal_points: u32,
    /// Fixed seed for message selection. Random when unset.
    #[serde(default)]
    pub message_seed: Option<u64>,
}

/// Ambient message configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_low_health_below")]
    pub low_health_below: u8,
    #[serde(default = "default_busy_todo_above")]
    pub busy_todo_above: usize,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub mood: MoodConfig,
    #[serde(default = "StageTable::default_stages")]
    pub stages: Vec<EvolutionStage>,
    #[serde(default = "Catalog::default_items")]
    pub shop: Vec<ShopItem>,
}

// Default functions
fn default_initial_points() -> u32 {
    250
}
fn default_initial_health() -> u8 {
    100
}
fn default_greeting() -> String {
    "Let's get started on our tasks!".into()
}
fn default_assignment_points() -> u32 {
    50
}
fn default_goal_points() -> u32 {
    20
}
fn default_interval_secs() -> u64 {
    15
}
fn default_low_health_below() -> u8 {
    MoodThresholds::default().low_health_below
}
fn default_busy_todo_above() -> usize {
    MoodThresholds::default().busy_todo_above
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_points: default_initial_points(),
            initial_health: default_initial_health(),
            greeting: default_greeting(),
            default_assignment_points: default_assignment_points(),
            default_goal_points: default_goal_points(),
            message_seed: None,
        }
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            low_health_below: default_low_health_below(),
            busy_todo_above: default_busy_todo_above(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            mood: MoodConfig::default(),
            stages: StageTable::default_stages(),
            shop: Catalog::default_items(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    /// `<config_dir>/tamadoro/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tamadoro").join("config.toml"))
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    /// Returns `ParseFailed` for malformed TOML or mistyped fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a specific file.
    ///
    /// # Errors
    /// Returns `LoadFailed` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Load from the default location, or fall back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error if a file exists but cannot be read or parsed.
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Render as pretty TOML.
    ///
    /// # Errors
    /// Returns `ParseFailed` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Array elements are addressed by index, e.g. `stages.1.name`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Validated stage table.
    ///
    /// # Errors
    /// Returns `InvalidValue` when the thresholds are malformed.
    pub fn stage_table(&self) -> Result<StageTable, ConfigError> {
        StageTable::new(self.stages.clone())
    }

    /// Validated shop catalog.
    ///
    /// # Errors
    /// Returns `InvalidValue` for duplicate ids or blank names.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        Catalog::new(self.shop.clone())
    }

    pub fn mood_thresholds(&self) -> MoodThresholds {
        MoodThresholds {
            low_health_below: self.mood.low_health_below,
            busy_todo_above: self.mood.busy_todo_above,
        }
    }

    /// Period of the ambient message ticker, at least one second.
    pub fn message_interval(&self) -> Duration {
        Duration::from_secs(self.mood.interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = cfg.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.session.initial_points, 250);
        assert_eq!(cfg.session.initial_health, 100);
        assert_eq!(cfg.session.greeting, "Let's get started on our tasks!");
        assert_eq!(cfg.session.default_assignment_points, 50);
        assert_eq!(cfg.session.default_goal_points, 20);
        assert_eq!(cfg.mood.interval_secs, 15);
        assert_eq!(cfg.message_interval(), Duration::from_secs(15));
        assert_eq!(cfg.stages.len(), 4);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [session]
            initial_points = 500

            [mood]
            interval_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.session.initial_points, 500);
        assert_eq!(cfg.session.default_goal_points, 20);
        assert_eq!(cfg.message_interval(), Duration::from_secs(1));
        assert_eq!(cfg.stages, StageTable::default_stages());
        assert_eq!(cfg.shop, Catalog::default_items());
    }

    #[test]
    fn custom_stage_table_is_validated() {
        let cfg = Config::from_toml_str(
            r#"
            [[stages]]
            name = "Seed"
            min_experience = 0

            [[stages]]
            name = "Sprout"
            min_experience = 0
            "#,
        )
        .unwrap();
        assert!(cfg.stage_table().is_err());
    }

    #[test]
    fn mistyped_field_fails_to_parse() {
        let err = Config::from_toml_str("[session]\ninitial_points = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.initial_points").as_deref(), Some("250"));
        assert_eq!(cfg.get("stages.1.name").as_deref(), Some("Child"));
        assert_eq!(cfg.get("shop.0.category").as_deref(), Some("decoration"));
        assert!(cfg.get("session.missing_key").is_none());
        assert!(cfg.get("stages.99").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\ngreeting = \"Hi!\"").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.session.greeting, "Hi!");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        match Config::load(&path) {
            Err(ConfigError::LoadFailed { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }
}
