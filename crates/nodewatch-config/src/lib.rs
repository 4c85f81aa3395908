//! Shared configuration for the nodewatch CLI.
//!
//! A flat TOML file, layered under `NODEWATCH_*` environment variables,
//! and its translation to `nodewatch_core::ClientConfig`. The CLI puts
//! its flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use url::Url;

use nodewatch_core::ClientConfig;

pub const ENV_PREFIX: &str = "NODEWATCH_";

/// Keys accepted by [`Config::set`].
pub const KEYS: [&str; 9] = [
    "api_url",
    "network",
    "auto_refresh",
    "refresh_interval_ms",
    "timeout_secs",
    "page_limit",
    "output",
    "color",
    "insecure",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

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

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Which cluster the backend reports on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Network {
    #[default]
    Mainnet,
    Devnet,
}

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Dashboard backend base URL.
    pub api_url: String,
    pub network: Network,
    /// Re-fetch periodically in `nodes watch`.
    pub auto_refresh: bool,
    pub refresh_interval_ms: u64,
    pub timeout_secs: u64,
    /// Nodes per page.
    pub page_limit: u32,
    /// Default output format (table, json, json-compact, yaml, plain).
    pub output: String,
    /// Color mode (auto, always, never).
    pub color: String,
    /// Skip TLS verification.
    pub insecure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".into(),
            network: Network::default(),
            auto_refresh: true,
            refresh_interval_ms: 7000,
            timeout_secs: 30,
            page_limit: 50,
            output: "table".into(),
            color: "auto".into(),
            insecure: false,
        }
    }
}

impl Config {
    /// Set one key from its string form, as `config set` does.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" => {
                Url::parse(value).map_err(|e| invalid(key, e.to_string()))?;
                value.clone_into(&mut self.api_url);
            }
            "network" => {
                self.network = value
                    .parse()
                    .map_err(|_| invalid(key, "expected 'mainnet' or 'devnet'"))?;
            }
            "auto_refresh" => self.auto_refresh = parse_bool(key, value)?,
            "insecure" => self.insecure = parse_bool(key, value)?,
            "refresh_interval_ms" => self.refresh_interval_ms = parse_num(key, value)?,
            "timeout_secs" => self.timeout_secs = parse_num(key, value)?,
            "page_limit" => {
                let limit: u32 = parse_num(key, value)?;
                if limit == 0 {
                    return Err(invalid(key, "must be at least 1"));
                }
                self.page_limit = limit;
            }
            "output" => value.clone_into(&mut self.output),
            "color" => value.clone_into(&mut self.color),
            other => return Err(ConfigError::UnknownKey(other.into())),
        }
        Ok(())
    }

    /// The auto-refresh period, or zero when auto-refresh is off.
    pub fn refresh_interval(&self) -> Duration {
        if self.auto_refresh {
            Duration::from_millis(self.refresh_interval_ms)
        } else {
            Duration::ZERO
        }
    }

    /// Build the core client config, validating the URL and page size.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let url = Url::parse(&self.api_url).map_err(|e| invalid("api_url", e.to_string()))?;
        if self.page_limit == 0 {
            return Err(invalid("page_limit", "must be at least 1"));
        }

        let mut client = ClientConfig::new(url);
        client.timeout = Duration::from_secs(self.timeout_secs);
        client.refresh_interval = self.refresh_interval();
        client.page_limit = self.page_limit;
        client.accept_invalid_certs = self.insecure;
        Ok(client)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, format!("expected true or false, got '{value}'")))
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, format!("expected a number, got '{value}'")))
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "nodewatch", "nodewatch").map_or_else(
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
    p.push("nodewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = file_figment(path)
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;
    Ok(config)
}

/// Load config from `path` alone, ignoring the environment.
///
/// Used when the result is written back, so env overrides never leak
/// into the file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    Ok(file_figment(path).extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
