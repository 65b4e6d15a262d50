// ── Panel kinds ──
//
// Each dashboard panel is one backend resource: a status endpoint, an
// optional local form seeded from it, and, for controllable panels, a
// write endpoint with its own set of success tokens.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use plantwall_api::{
    Ack, Error as ApiError, LightingControl, LightingStatus, PlantWallClient, SensorData,
    SystemStatus, WateringControl, WateringStatus,
};

use super::lighting::LightingForm;
use super::watering::WateringForm;

/// A read side of one backend resource.
pub trait PanelKind: fmt::Debug + Clone + Copy + Send + Sync + 'static {
    /// Last known server state.
    type Status: fmt::Debug + Clone + Send + Sync + 'static;
    /// User-editable draft. `()` for read-only panels.
    type Form: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static;

    /// Short human name used in logs and banners.
    const NAME: &'static str;

    fn fetch(api: &PlantWallClient) -> impl Future<Output = Result<Self::Status, ApiError>> + Send;

    /// Copy server values into a fresh form. Runs once per panel.
    fn seed(_form: &mut Self::Form, _status: &Self::Status) {}
}

/// A panel that also accepts writes.
pub trait ControlKind: PanelKind {
    type Control: fmt::Debug + Clone + Serialize + Send + Sync + 'static;

    /// Acknowledgement tokens this endpoint uses for success.
    const ACCEPTED: &'static [&'static str];

    fn send(
        api: &PlantWallClient,
        control: &Self::Control,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;
}

// ── Read-only kinds ──────────────────────────────────────────────────

/// Whole-wall summary from `/api/status`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overview;

impl PanelKind for Overview {
    type Status = SystemStatus;
    type Form = ();
    const NAME: &'static str = "system status";

    fn fetch(api: &PlantWallClient) -> impl Future<Output = Result<SystemStatus, ApiError>> + Send {
        api.status()
    }
}

/// Raw sensor readings from `/api/sensors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sensors;

impl PanelKind for Sensors {
    type Status = SensorData;
    type Form = ();
    const NAME: &'static str = "sensor data";

    fn fetch(api: &PlantWallClient) -> impl Future<Output = Result<SensorData, ApiError>> + Send {
        api.sensors()
    }
}

// ── Controllable kinds ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct Lighting;

impl PanelKind for Lighting {
    type Status = LightingStatus;
    type Form = LightingForm;
    const NAME: &'static str = "lighting status";

    fn fetch(
        api: &PlantWallClient,
    ) -> impl Future<Output = Result<LightingStatus, ApiError>> + Send {
        api.lighting()
    }

    fn seed(form: &mut LightingForm, status: &LightingStatus) {
        form.brightness = status.brightness;
        form.schedule_enabled = status.schedule_enabled;
    }
}

impl ControlKind for Lighting {
    type Control = LightingControl;
    const ACCEPTED: &'static [&'static str] = &["success", "toggled"];

    fn send(
        api: &PlantWallClient,
        control: &LightingControl,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send {
        api.update_lighting(control)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Watering;

impl PanelKind for Watering {
    type Status = WateringStatus;
    type Form = WateringForm;
    const NAME: &'static str = "watering status";

    fn fetch(
        api: &PlantWallClient,
    ) -> impl Future<Output = Result<WateringStatus, ApiError>> + Send {
        api.watering()
    }

    fn seed(form: &mut WateringForm, status: &WateringStatus) {
        form.auto_mode = status.auto_mode;
    }
}

impl ControlKind for Watering {
    type Control = WateringControl;
    const ACCEPTED: &'static [&'static str] = &["success", "watering started"];

    fn send(
        api: &PlantWallClient,
        control: &WateringControl,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send {
        api.update_watering(control)
    }
}
