use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "ACAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        locations.push([dir.as_str(), "acal", "config.toml"].iter().collect());
    } else if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("acal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".acal.toml"));
    }

    locations
}

fn default_tick_rate() -> u64 {
    500
}

fn default_loading_delay() -> u64 {
    1000
}

fn default_show_legend() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Redraw interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u64,
    /// Time in milliseconds the loading screen is shown after start
    #[serde(default = "default_loading_delay")]
    pub loading_delay: u64,
    #[serde(default = "default_show_legend")]
    pub show_legend: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate: default_tick_rate(),
            loading_delay: default_loading_delay(),
            show_legend: default_show_legend(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| {
            let msg = match &e.message {
                Some(message) => format!("{}: {}", path.display(), message),
                None => path.display().to_string(),
            };
            e.with_msg(&msg)
        })
    }

    pub fn from_toml(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;

        if config.tick_rate == 0 {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "tick_rate must be greater than 0",
            ));
        }

        Ok(config)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate)
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay)
    }
}

/// Loads `path` if given, otherwise the first existing file of the default
/// locations. Falls back to the built-in defaults if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading config from {}", path.display());
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Loading config from {}", location.display());
            Config::load(&location)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
