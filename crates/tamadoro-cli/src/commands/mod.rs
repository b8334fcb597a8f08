pub mod config;
pub mod play;
pub mod shop;
pub mod stages;

use std::path::Path;

use tamadoro_core::{Config, ConfigError};

/// Read the explicit config file, or the default one when none was given.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(),
    }
}
