//! Shared configuration for the plant-wall CLI and TUI.
//!
//! TOML profiles, environment-based backend selection, and translation
//! to `plantwall_core::DashboardConfig`. Both binaries depend on this
//! crate; the CLI adds `GlobalOpts`-aware wrappers on top.

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
use url::Url;

use plantwall_core::{DashboardConfig, PanelConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
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

// ── Deployment environment ──────────────────────────────────────────

/// Which backend a profile talks to when no explicit URL is set.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Backend reachable by service name inside the deployment network.
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn default_url(self) -> &'static str {
        match self {
            Self::Production => "http://backend:5000",
            Self::Development => "http://localhost:5000",
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Delay before the post-write re-fetch, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Banner lifetime in seconds.
    #[serde(default = "default_banner_ttl")]
    pub banner_ttl: u64,

    #[serde(default)]
    pub environment: Environment,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            settle_delay_ms: default_settle_delay_ms(),
            banner_ttl: default_banner_ttl(),
            environment: Environment::default(),
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
    10
}
fn default_poll_interval() -> u64 {
    30
}
fn default_settle_delay_ms() -> u64 {
    1000
}
fn default_banner_ttl() -> u64 {
    5
}

/// A named backend profile. Every field is optional; unset fields fall
/// back to `Defaults`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Explicit backend base URL (e.g. "http://192.168.1.40:5000").
    /// Wins over `environment`.
    pub backend: Option<String>,

    pub environment: Option<Environment>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    pub poll_interval: Option<u64>,
}

impl Config {
    /// Resolve the active profile name: requested > `default_profile` >
    /// `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. An explicitly requested profile must exist;
    /// the implicit default may be absent.
    pub fn select_profile(
        &self,
        requested: Option<&str>,
    ) -> Result<(String, Option<&Profile>), ConfigError> {
        let name = self.active_profile_name(requested);
        match (self.profiles.get(&name), requested) {
            (Some(profile), _) => Ok((name, Some(profile))),
            (None, Some(_)) => Err(ConfigError::ProfileNotFound { name }),
            (None, None) => Ok((name, None)),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "plantwall", "plantwall").map_or_else(
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
    p.push("plantwall");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered as defaults < file < `PLANTWALL_*`
/// environment (nested keys split on `__`, e.g.
/// `PLANTWALL_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PLANTWALL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Pick the backend URL: an explicit URL wins, otherwise the
/// environment's well-known address.
pub fn resolve_backend_url(
    explicit: Option<&str>,
    environment: Environment,
) -> Result<Url, ConfigError> {
    let raw = explicit.unwrap_or_else(|| environment.default_url());
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "backend".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build a `DashboardConfig` from defaults and an optional profile, with
/// no CLI flag overrides. Used by the TUI.
pub fn dashboard_config(
    defaults: &Defaults,
    profile: Option<&Profile>,
) -> Result<DashboardConfig, ConfigError> {
    let environment = profile
        .and_then(|p| p.environment)
        .unwrap_or(defaults.environment);
    let url = resolve_backend_url(profile.and_then(|p| p.backend.as_deref()), environment)?;

    let timeout = profile.and_then(|p| p.timeout).unwrap_or(defaults.timeout);
    let poll = profile
        .and_then(|p| p.poll_interval)
        .unwrap_or(defaults.poll_interval);

    if poll == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(DashboardConfig {
        url,
        timeout: Duration::from_secs(timeout),
        panel: PanelConfig {
            poll_interval: Duration::from_secs(poll),
            settle_delay: Duration::from_millis(defaults.settle_delay_ms),
            banner_ttl: Duration::from_secs(defaults.banner_ttl),
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn environment_urls() {
        assert_eq!(
            resolve_backend_url(None, Environment::Production)
                .unwrap()
                .as_str(),
            "http://backend:5000/"
        );
        assert_eq!(
            resolve_backend_url(None, Environment::default())
                .unwrap()
                .as_str(),
            "http://localhost:5000/"
        );
    }

    #[test]
    fn explicit_backend_wins_over_environment() {
        let url = resolve_backend_url(Some("http://10.0.0.5:5000"), Environment::Production);
        assert_eq!(url.unwrap().host_str(), Some("10.0.0.5"));
    }

    #[test]
    fn non_http_backend_is_rejected() {
        let err = resolve_backend_url(Some("ftp://backend"), Environment::Development);
        assert!(matches!(err, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "greenhouse"

[defaults]
timeout = 4
environment = "production"

[profiles.greenhouse]
backend = "http://192.168.1.40:5000"
poll_interval = 15
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timeout, 4);
        assert_eq!(cfg.defaults.environment, Environment::Production);
        assert_eq!(cfg.defaults.output, "table");

        let (name, profile) = cfg.select_profile(None).unwrap();
        assert_eq!(name, "greenhouse");
        let dash = dashboard_config(&cfg.defaults, profile).unwrap();
        assert_eq!(dash.url.as_str(), "http://192.168.1.40:5000/");
        assert_eq!(dash.timeout, Duration::from_secs(4));
        assert_eq!(dash.panel.poll_interval, Duration::from_secs(15));
        assert_eq!(dash.panel.settle_delay, Duration::from_secs(1));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        let (_, profile) = cfg.select_profile(None).unwrap();
        assert!(profile.is_none());
        let dash = dashboard_config(&cfg.defaults, profile).unwrap();
        assert_eq!(dash.url.as_str(), "http://localhost:5000/");
        assert_eq!(dash.panel.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn requested_profile_must_exist() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.select_profile(Some("basement")),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn save_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                environment: Some(Environment::Production),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (_, profile) = loaded.select_profile(None).unwrap();
        assert_eq!(
            profile.and_then(|p| p.environment),
            Some(Environment::Production)
        );
    }

    #[test]
    fn profile_fields_reach_dashboard_config() {
        let profile = Profile {
            backend: Some("http://192.168.1.40:5000".into()),
            timeout: Some(4),
            ..Profile::default()
        };
        let cfg = dashboard_config(&Defaults::default(), Some(&profile)).unwrap();
        assert_eq!(cfg.url.as_str(), "http://192.168.1.40:5000/");
        assert_eq!(cfg.transport().timeout, Duration::from_secs(4));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let profile = Profile {
            poll_interval: Some(0),
            ..Profile::default()
        };
        assert!(dashboard_config(&Defaults::default(), Some(&profile)).is_err());
    }
}
