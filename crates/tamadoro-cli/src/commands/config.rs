use std::path::Path;

use clap::Subcommand;

use super::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Get a config value
    Get {
        /// Config key (e.g. "session.initial_points", "stages.1.name")
        key: String,
    },
    /// Print the default config file location
    Path,
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = load_config(path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Get { key } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Path => match tamadoro_core::Config::default_path() {
            Some(path) => println!("{}", path.display()),
            None => return Err("no config directory on this platform".into()),
        },
    }
    Ok(())
}
