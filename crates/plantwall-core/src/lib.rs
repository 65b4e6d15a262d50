// plantwall-core: poll-and-reconcile layer between plantwall-api and
// the frontends (CLI/TUI).

pub mod config;
pub mod controls;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod panel;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, PanelConfig};
pub use dashboard::{Dashboard, HealthCheck};
pub use error::CoreError;
pub use panel::{
    Banner, BannerKind, ControlKind, Lighting, LightingForm, LightingPanel, Overview,
    OverviewPanel, Panel, PanelKind, PanelPhase, PanelState, PanelSubscription, Sensors,
    SensorsPanel, Watering, WateringForm, WateringPanel,
};
pub use stream::{PanelStream, PanelWatchStream};

// Re-export wire types at the crate root so frontends depend on one crate.
pub use plantwall_api::{
    Ack, HealthStatus, LightingControl, LightingSchedule, LightingStatus, SensorData,
    SystemHealth, SystemStatus, WateringControl, WateringSchedule, WateringStatus,
};
