//! CLI configuration: thin wrapper around `plantwall_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--backend, --env, --timeout).

use std::time::Duration;

use plantwall_core::DashboardConfig;

use crate::cli::{EnvironmentArg, GlobalOpts};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use plantwall_config::{
    Config, Defaults, Environment, Profile, config_path, load_config, load_config_or_default,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Production => Environment::Production,
            EnvironmentArg::Development => Environment::Development,
        }
    }
}

/// Build a `DashboardConfig` from the config file, profile, and flags.
///
/// Flag overrides take priority: `--backend` > profile backend >
/// `--env` > profile environment > default environment.
pub fn resolve_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    let (_, profile) = cfg.select_profile(global.profile.as_deref()).map_err(|e| {
        let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
        names.sort();
        match e {
            plantwall_config::ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            },
            other => other.into(),
        }
    })?;

    let mut dashboard = plantwall_config::dashboard_config(&cfg.defaults, profile)?;

    if global.backend.is_some() || global.environment.is_some() {
        let environment = global.environment.map_or_else(
            || {
                profile
                    .and_then(|p| p.environment)
                    .unwrap_or(cfg.defaults.environment)
            },
            Environment::from,
        );
        let explicit = global
            .backend
            .as_deref()
            .or_else(|| profile.and_then(|p| p.backend.as_deref()));
        dashboard.url = plantwall_config::resolve_backend_url(explicit, environment)?;
    }

    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(url = %dashboard.url, timeout = ?dashboard.timeout, "resolved backend");
    Ok(dashboard)
}
