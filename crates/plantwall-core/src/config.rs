// ── Runtime dashboard configuration ──
//
// These types describe *where* the backend lives and how often panels
// talk to it. They never touch disk: the CLI/TUI resolve a profile
// through plantwall-config and hand a `DashboardConfig` in.

use std::time::Duration;

use url::Url;

use plantwall_api::transport::{DEFAULT_TIMEOUT, TransportConfig};

/// Background re-fetch cadence for mounted panels.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Pause between an accepted write and the follow-up re-fetch.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How long a feedback banner stays up.
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(5);

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Timing knobs shared by every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub banner_ttl: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            banner_ttl: DEFAULT_BANNER_TTL,
        }
    }
}

/// Configuration for talking to one backend.
///
/// Built by CLI/TUI, passed to `Dashboard`.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root (e.g. `http://backend:5000`).
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    pub panel: PanelConfig,
}

impl DashboardConfig {
    /// Config for `url` with default timeout and panel cadence.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
            panel: PanelConfig::default(),
        }
    }

    /// Build the transport settings for this backend.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn local() -> DashboardConfig {
        DashboardConfig::new(Url::parse(DEFAULT_BACKEND_URL).unwrap())
    }

    #[test]
    fn defaults_match_dashboard_cadence() {
        let cfg = local();
        assert_eq!(cfg.url.as_str(), "http://localhost:5000/");
        assert_eq!(cfg.panel.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.panel.settle_delay, Duration::from_secs(1));
        assert_eq!(cfg.panel.banner_ttl, Duration::from_secs(5));
    }

    #[test]
    fn timeout_flows_into_transport() {
        let cfg = DashboardConfig {
            timeout: Duration::from_secs(3),
            ..local()
        };
        assert_eq!(cfg.transport().timeout, Duration::from_secs(3));
        assert_eq!(local().transport().timeout, DEFAULT_TIMEOUT);
    }
}
