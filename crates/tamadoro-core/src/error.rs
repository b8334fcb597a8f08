//! Core error types for tamadoro-core.
//!
//! Only [`ConfigError`] is fatal, and only at start-up: a session cannot be
//! built from a malformed stage table or catalog. Everything else is a
//! rejection the caller shows to the user while the session carries on.

use std::path::PathBuf;
use thiserror::Error;

use crate::shop::ItemId;

/// Core error type for tamadoro-core.
///
/// Front ends run each command through this so every rejection renders the
/// same way.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Shop purchase was refused
    #[error("Purchase rejected: {0}")]
    Purchase(#[from] PurchaseRejection),

    /// Accessory fitting was refused
    #[error("Fitting rejected: {0}")]
    Fit(#[from] FitRejection),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Validation errors raised by session commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A name was empty or whitespace only
    #[error("{field} name must not be empty")]
    EmptyName { field: &'static str },

    /// No deadline was supplied
    #[error("Deadline is required")]
    MissingDeadline,

    /// Deadline was not a `YYYY-MM-DD` calendar date
    #[error("Invalid deadline '{value}': expected YYYY-MM-DD")]
    InvalidDeadline { value: String },

    /// Month outside 1..=12 or year outside chrono's range
    #[error("Invalid calendar month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Reasons a shop purchase is refused. The session is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseRejection {
    #[error("item {0} is already owned")]
    AlreadyOwned(ItemId),

    #[error("item costs {price} points but only {balance} are available")]
    InsufficientPoints { price: u32, balance: u32 },

    #[error("no shop item with id {0}")]
    UnknownItem(ItemId),
}

/// Reasons an accessory fitting is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitRejection {
    #[error("no shop item with id {0}")]
    UnknownItem(ItemId),

    #[error("item {0} has not been purchased")]
    NotOwned(ItemId),

    #[error("item {0} cannot be adjusted")]
    NotAdjustable(ItemId),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_points_message_names_both_amounts() {
        let err = PurchaseRejection::InsufficientPoints {
            price: 120,
            balance: 40,
        };
        assert_eq!(
            err.to_string(),
            "item costs 120 points but only 40 are available"
        );
    }

    #[test]
    fn core_error_wraps_config_error() {
        let err: CoreError = ConfigError::invalid("stages", "empty").into();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(err.to_string().contains("stages"));
    }

    #[test]
    fn rejections_convert_with_question_mark() {
        fn buy() -> Result<u32> {
            Err(PurchaseRejection::AlreadyOwned(ItemId(3)))?
        }
        let err = buy().unwrap_err();
        assert!(matches!(err, CoreError::Purchase(PurchaseRejection::AlreadyOwned(_))));
        assert_eq!(err.to_string(), "Purchase rejected: item 3 is already owned");
    }

    #[test]
    fn json_errors_convert() {
        let err: CoreError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
