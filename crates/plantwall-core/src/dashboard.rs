// ── Dashboard facade ──
//
// Owns the shared backend client and one panel per resource. Frontends
// mount the whole set at once (TUI) or drive individual panels without
// mounting (CLI one-shot commands).

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use plantwall_api::{HealthStatus, PlantWallClient, SystemHealth};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::panel::{
    Lighting, LightingPanel, Overview, OverviewPanel, PanelSubscription, Sensors, SensorsPanel,
    Watering, WateringPanel,
};

// ── HealthCheck ──────────────────────────────────────────────────

/// Outcome of `GET /api/health`.
#[derive(Debug)]
pub enum HealthCheck {
    Healthy(HealthStatus),
    Unavailable(CoreError),
}

impl HealthCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }

    /// One-line banner text for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Healthy(h) => format!("System health check: {}", h.status),
            Self::Unavailable(_) => "Health check failed - backend may be unavailable".to_owned(),
        }
    }
}

// ── Dashboard ────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    api: Arc<PlantWallClient>,
    cancel: CancellationToken,
    overview: OverviewPanel,
    sensors: SensorsPanel,
    lighting: LightingPanel,
    watering: WateringPanel,
    mounts: Mutex<Option<Mounts>>,
}

struct Mounts {
    overview: PanelSubscription<Overview>,
    sensors: PanelSubscription<Sensors>,
    lighting: PanelSubscription<Lighting>,
    watering: PanelSubscription<Watering>,
}

impl Dashboard {
    /// Build the client and panels. Does NOT fetch anything; call
    /// [`mount()`](Self::mount) to start polling.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let api = Arc::new(PlantWallClient::new(
            config.url.clone(),
            &config.transport(),
        )?);
        let cancel = CancellationToken::new();
        let panel_cfg = config.panel;

        Ok(Self {
            inner: Arc::new(DashboardInner {
                overview: OverviewPanel::with_parent(Arc::clone(&api), panel_cfg, &cancel),
                sensors: SensorsPanel::with_parent(Arc::clone(&api), panel_cfg, &cancel),
                lighting: LightingPanel::with_parent(Arc::clone(&api), panel_cfg, &cancel),
                watering: WateringPanel::with_parent(Arc::clone(&api), panel_cfg, &cancel),
                config,
                api,
                cancel,
                mounts: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn overview(&self) -> &OverviewPanel {
        &self.inner.overview
    }

    pub fn sensors(&self) -> &SensorsPanel {
        &self.inner.sensors
    }

    pub fn lighting(&self) -> &LightingPanel {
        &self.inner.lighting
    }

    pub fn watering(&self) -> &WateringPanel {
        &self.inner.watering
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Mount every panel: initial fetches plus background polling.
    pub async fn mount(&self) -> Result<(), CoreError> {
        let mut mounts = self.inner.mounts.lock().await;
        if mounts.is_some() {
            return Err(CoreError::AlreadyMounted);
        }
        *mounts = Some(Mounts {
            overview: self.inner.overview.mount()?,
            sensors: self.inner.sensors.mount()?,
            lighting: self.inner.lighting.mount()?,
            watering: self.inner.watering.mount()?,
        });
        info!(url = %self.inner.config.url, "dashboard mounted");
        Ok(())
    }

    /// Unmount every panel and stop all background work.
    pub async fn shutdown(&self) {
        let mounts = self.inner.mounts.lock().await.take();
        self.inner.cancel.cancel();
        if let Some(m) = mounts {
            tokio::join!(
                m.overview.unmount(),
                m.sensors.unmount(),
                m.lighting.unmount(),
                m.watering.unmount(),
            );
        }
        debug!("dashboard shut down");
    }

    /// Fetch every panel once, concurrently. Returns the first error.
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        let (overview, sensors, lighting, watering) = tokio::join!(
            self.inner.overview.refresh(),
            self.inner.sensors.refresh(),
            self.inner.lighting.refresh(),
            self.inner.watering.refresh(),
        );
        overview.and(sensors).and(lighting).and(watering)
    }

    // ── Health ───────────────────────────────────────────────────

    pub async fn check_health(&self) -> HealthCheck {
        match self.inner.api.health().await {
            Ok(health) => HealthCheck::Healthy(health),
            Err(e) => HealthCheck::Unavailable(e.into()),
        }
    }

    /// Per-subsystem flags derived from the panels' current state.
    pub fn system_health(&self) -> SystemHealth {
        let watering = self.inner.watering.state();
        let emergency = watering.status.as_ref().is_some_and(|s| s.emergency_stop);
        SystemHealth::from_subsystems(
            self.inner.sensors.state().is_healthy(),
            watering.is_healthy() && !emergency,
            self.inner.lighting.state().is_healthy(),
            self.inner.overview.state().is_healthy(),
        )
    }

    // ── One-shot ─────────────────────────────────────────────────

    /// Build a dashboard, run `f`, then shut everything down.
    ///
    /// Panels are not mounted; `f` drives them directly.
    pub async fn oneshot<F, Fut, T>(config: DashboardConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let dashboard = Dashboard::new(config)?;
        let result = f(dashboard.clone()).await;
        dashboard.shutdown().await;
        result
    }
}
