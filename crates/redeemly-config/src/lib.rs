//! Shared configuration for redeemly.
//!
//! TOML settings (active ledger, limit preset, recent-activity window),
//! loaded through figment and translated into a core `SessionSettings`.
//! The CLI layers its `GlobalOpts` overrides on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use redeemly_core::{DEFAULT_RECENT, DisplayOrder, RecentOptions, SessionSettings};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "REDEEMLY_CONFIG";

/// File name of a ledger created without any configuration.
pub const DEFAULT_LEDGER_FILE: &str = "data.xlsx";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Active ledger file. Falls back to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Redemption limit for new barcodes. Unset means ask every time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Rows in the recent-activity report.
    #[serde(default = "default_recent")]
    pub recent: usize,

    #[serde(default)]
    pub order: DisplayOrder,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            limit: None,
            recent: default_recent(),
            order: DisplayOrder::default(),
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_recent() -> usize {
    DEFAULT_RECENT
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// The ledger to open: configured path, else the platform default.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger.clone().unwrap_or_else(default_ledger_path)
    }

    pub fn recent_options(&self) -> RecentOptions {
        RecentOptions {
            count: self.defaults.recent,
            order: self.defaults.order,
            scroll_to_newest: false,
        }
    }

    /// Core session settings for this configuration.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        if let Some(limit) = self.defaults.limit {
            redeemly_core::model::validate_limit(limit).map_err(|e| ConfigError::Validation {
                field: "defaults.limit".into(),
                reason: e.to_string(),
            })?;
        }
        if self.defaults.recent == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.recent".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(SessionSettings {
            ledger: self.ledger_path(),
            default_limit: self.defaults.limit,
            recent: self.recent_options(),
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "redeemly", "redeemly")
}

/// Resolve the config file path: `REDEEMLY_CONFIG`, else XDG / platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("redeemly");
    p
}

/// Where the ledger lives when nothing is configured.
pub fn default_ledger_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(DEFAULT_LEDGER_FILE),
        |dirs| dirs.data_dir().join(DEFAULT_LEDGER_FILE),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still merging `REDEEMLY_*` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("REDEEMLY_").ignore(&["config"]).split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
