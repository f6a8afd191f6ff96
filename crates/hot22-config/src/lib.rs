//! Configuration for the HOT22 dashboard.
//!
//! TOML profiles layered under `HOT22_` environment overrides, and the
//! translation to `hot22_core::DashboardConfig`. The CLI adds flag
//! overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hot22_core::DashboardConfig;

/// API address used when no profile names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Env vars read directly by the CLI rather than through the file layers.
const DIRECT_ENV: &[&str] = &["api_url", "timeout", "dev_mode", "profile", "output", "config"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

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

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is selected.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Real-time polling interval in seconds.
    #[serde(default = "default_realtime_interval")]
    pub realtime_interval: u64,

    #[serde(default = "default_search_history")]
    pub search_history_limit: usize,

    #[serde(default = "default_lookup_history")]
    pub lookup_history_limit: usize,

    /// Where exports land. Current directory when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            realtime_interval: default_realtime_interval(),
            search_history_limit: default_search_history(),
            lookup_history_limit: default_lookup_history(),
            download_dir: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    hot22_core::DEFAULT_PAGE_SIZE
}
fn default_realtime_interval() -> u64 {
    10
}
fn default_search_history() -> usize {
    10
}
fn default_lookup_history() -> usize {
    20
}

/// A named API profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:3000").
    pub api_url: String,

    /// Log every request and response at `info`.
    #[serde(default)]
    pub dev_mode: bool,

    pub timeout: Option<u64>,

    pub page_size: Option<u32>,

    pub realtime_interval: Option<u64>,

    pub download_dir: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            dev_mode: false,
            timeout: None,
            page_size: None,
            realtime_interval: None,
            download_dir: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hot22", "hot22")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for persisted state (search history).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hot22");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path. A missing file is not an error.
///
/// `HOT22_`-prefixed variables override file values, with `__` as the
/// nesting separator (`HOT22_DEFAULTS__TIMEOUT=5`,
/// `HOT22_PROFILES__STAGING__API_URL=...`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOT22_").ignore(DIRECT_ENV).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// Pick the requested profile, else `default_profile`. The implicit
    /// `default` profile (localhost) exists even when not written down.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());

        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if name == "default" => Ok((name, Profile::default())),
            None => Err(ConfigError::ProfileNotFound { name }),
        }
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = DashboardConfig::new(url);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.dev_mode = profile.dev_mode;
    config.page_size = page_size;
    config.realtime_interval = Duration::from_secs(
        profile
            .realtime_interval
            .unwrap_or(defaults.realtime_interval)
            .max(1),
    );
    config.search_history_limit = defaults.search_history_limit;
    config.lookup_history_limit = defaults.lookup_history_limit;
    if let Some(dir) = profile.download_dir.as_ref().or(defaults.download_dir.as_ref()) {
        config.download_dir.clone_from(dir);
    }
    Ok(config)
}
