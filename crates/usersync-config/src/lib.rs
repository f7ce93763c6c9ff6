//! Shared configuration for usersync tools.
//!
//! TOML profiles merged with `USERSYNC_` environment variables, and
//! translation to `usersync_core::ClientConfig`. The CLI layers its
//! `GlobalOpts` overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use usersync_core::{ClientConfig, ResourcePaths};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

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
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look a profile up by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds, for profiles that set none.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    ClientConfig::default().timeout.as_secs()
}

/// A named API profile: one deployment of the user API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "http://localhost:8080/api").
    pub base_url: String,

    /// Collection path under the base URL ("users" or "user").
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Paginated listing path; defaults to `{resource}/page`.
    pub paged_list: Option<String>,

    /// Override the `Content-Type` sent with requests.
    pub content_type: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_resource() -> String {
    ResourcePaths::default().collection
}

impl Profile {
    /// A profile for `base_url` with every other field at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource: default_resource(),
            paged_list: None,
            content_type: None,
            timeout: None,
        }
    }

    /// Resource paths this profile pins.
    pub fn resource_paths(&self) -> ResourcePaths {
        let collection = self.resource.trim_matches('/').to_owned();
        let paged_list = self.paged_list.as_deref().map_or_else(
            || format!("{collection}/page"),
            |p| p.trim_matches('/').to_owned(),
        );
        ResourcePaths {
            collection,
            paged_list,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "usersync", "usersync").map_or_else(
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
    p.push("usersync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; the defaults and environment still
/// apply. Nested keys are split on `__`, e.g.
/// `USERSYNC_PROFILES__STAGING__BASE_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("USERSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be loaded.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile translation ─────────────────────────────────────────────

/// Build a `ClientConfig` from a profile, with no CLI overrides.
///
/// The base URL must be an absolute `http`/`https` URL and the resource
/// paths must not be empty.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: format!("profiles.{profile_name}.base_url"),
            reason: format!("invalid URL '{}': {e}", profile.base_url),
        })?;

    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: format!("profiles.{profile_name}.base_url"),
            reason: format!("expected an http or https URL, got '{}'", profile.base_url),
        });
    }

    let paths = profile.resource_paths();
    for (field, value) in [
        ("resource", &paths.collection),
        ("paged_list", &paths.paged_list),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation {
                field: format!("profiles.{profile_name}.{field}"),
                reason: "path must not be empty".into(),
            });
        }
    }

    if profile.timeout == Some(0) {
        return Err(ConfigError::Validation {
            field: format!("profiles.{profile_name}.timeout"),
            reason: "timeout must be at least 1 second".into(),
        });
    }

    let defaults = ClientConfig::default();
    let timeout = profile
        .timeout
        .map_or(defaults.timeout, Duration::from_secs);
    let content_type = profile
        .content_type
        .clone()
        .unwrap_or(defaults.content_type);

    Ok(ClientConfig {
        base_url,
        timeout,
        content_type,
        paths,
    })
}
