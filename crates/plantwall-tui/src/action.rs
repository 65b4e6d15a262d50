//! All possible UI actions. Actions are the sole mechanism for state mutation.

use plantwall_core::{Lighting, Overview, PanelState, Sensors, SystemHealth, Watering};

use crate::screen::ScreenId;

/// A write the app should run against the backend on a screen's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    SetBrightness,
    ToggleLights,
    SaveLighting,
    StartWatering,
    ToggleAutoMode,
    SaveWateringSchedule,
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Panel state (from the data bridge) ────────────────────────
    OverviewUpdated(Box<PanelState<Overview>>),
    SensorsUpdated(Box<PanelState<Sensors>>),
    LightingUpdated(Box<PanelState<Lighting>>),
    WateringUpdated(Box<PanelState<Watering>>),
    HealthUpdated(SystemHealth),

    // ── Backend health ────────────────────────────────────────────
    RunHealthCheck,
    HealthChecked { ok: bool, message: String },

    // ── Commands ──────────────────────────────────────────────────
    RefreshAll,
    Control(Control),
}
