use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use taskdeck_core::DEFAULT_DAILY_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default task file when a subcommand gets no --tasks flag.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,
    /// Default number of tasks in a daily plan.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.json")
}

fn default_daily_limit() -> usize {
    DEFAULT_DAILY_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            daily_limit: default_daily_limit(),
        }
    }
}

pub fn taskdeck_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskdeck"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskdeck_home()?.join("config.toml"))
}

/// Load the config, falling back to defaults when the file is absent.
pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_partial_toml_with_serde_defaults() {
        let cfg: Config = toml::from_str("daily_limit = 7\n").unwrap();
        assert_eq!(cfg.daily_limit, 7);
        assert_eq!(cfg.tasks_file, PathBuf::from("tasks.json"));
    }
}
