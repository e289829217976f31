use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::core::TimelockContract;
use crate::domain::timelock::GRACE_PERIOD_SECS;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend base URL serving `/api/v1/abi/list`
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub abi_paths: Vec<String>,

    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,

    #[serde(default)]
    pub timelocks: Vec<TimelockContract>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            abi_paths: Vec::new(),
            grace_period_secs: GRACE_PERIOD_SECS,
            timelocks: Vec::new(),
        }
    }
}

impl Config {
    /// ABI directories with `~` expanded
    pub fn abi_dirs(&self) -> Vec<PathBuf> {
        self.abi_paths.iter().map(|p| expand_home(p)).collect()
    }

    pub fn timelock(&self, id: u64) -> Option<&TimelockContract> {
        self.timelocks.iter().find(|t| t.id == id)
    }
}

fn default_grace_period() -> u64 {
    GRACE_PERIOD_SECS
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "ignoring malformed config");
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TLC_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("tlc").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("tlc").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "tlc", "tlc")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
