// ── Watering panel operations ──
//
// Every write here is refused locally while the last fetched status
// reports an emergency stop.

use plantwall_api::{WateringControl, WateringSchedule};

use super::kind::Watering;
use super::{Panel, PanelState};
use crate::error::CoreError;

/// Draft watering settings. Only `auto_mode` is seeded from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WateringForm {
    /// Manual run length in seconds.
    pub duration_secs: u16,
    pub auto_mode: bool,
    pub interval_hours: u16,
}

impl Default for WateringForm {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            auto_mode: false,
            interval_hours: 24,
        }
    }
}

impl WateringForm {
    fn schedule(&self, enabled: bool) -> WateringSchedule {
        WateringSchedule {
            interval_hours: self.interval_hours,
            duration_seconds: self.duration_secs,
            enabled,
        }
    }
}

fn ensure_no_emergency_stop(state: &PanelState<Watering>) -> Result<(), CoreError> {
    if state.status.as_ref().is_some_and(|s| s.emergency_stop) {
        Err(CoreError::EmergencyStop)
    } else {
        Ok(())
    }
}

impl Panel<Watering> {
    /// Run the pump for the form's duration.
    pub async fn start_manual(&self) -> Result<(), CoreError> {
        self.submit(
            "start watering",
            |s| {
                ensure_no_emergency_stop(s)?;
                Ok(WateringControl {
                    duration: Some(s.form.duration_secs),
                    auto_mode: Some(false),
                    schedule: None,
                })
            },
            |_, control| {
                format!(
                    "Manual watering started for {} seconds",
                    control.duration.unwrap_or_default()
                )
            },
        )
        .await
    }

    /// Flip automatic mode, sending the form's schedule along.
    pub async fn toggle_auto_mode(&self) -> Result<(), CoreError> {
        self.auto_mode(None).await
    }

    /// Set automatic mode explicitly.
    pub async fn set_auto_mode(&self, enabled: bool) -> Result<(), CoreError> {
        self.auto_mode(Some(enabled)).await
    }

    async fn auto_mode(&self, target: Option<bool>) -> Result<(), CoreError> {
        self.submit(
            "toggle auto mode",
            |s| {
                ensure_no_emergency_stop(s)?;
                let enabled = target.unwrap_or(!s.form.auto_mode);
                Ok(WateringControl {
                    duration: None,
                    auto_mode: Some(enabled),
                    schedule: Some(s.form.schedule(enabled)),
                })
            },
            |form, control| {
                let enabled = control.auto_mode.unwrap_or(form.auto_mode);
                form.auto_mode = enabled;
                if enabled {
                    "Auto mode enabled successfully!".to_owned()
                } else {
                    "Auto mode disabled successfully!".to_owned()
                }
            },
        )
        .await
    }

    /// Submit the schedule under the current auto-mode setting.
    pub async fn save_schedule(&self) -> Result<(), CoreError> {
        self.submit(
            "update schedule",
            |s| {
                ensure_no_emergency_stop(s)?;
                Ok(WateringControl {
                    duration: None,
                    auto_mode: Some(s.form.auto_mode),
                    schedule: Some(s.form.schedule(s.form.auto_mode)),
                })
            },
            |_, _| "Schedule updated successfully!".to_owned(),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use plantwall_api::WateringStatus;

    use super::*;

    fn status(emergency_stop: bool) -> WateringStatus {
        WateringStatus {
            is_running: false,
            water_level: 55.0,
            last_watering: Utc.with_ymd_and_hms(2024, 6, 15, 6, 0, 0).unwrap(),
            emergency_stop,
            auto_mode: true,
            next_scheduled: None,
        }
    }

    #[test]
    fn guard_blocks_only_during_emergency_stop() {
        let mut state = PanelState::<Watering>::default();
        assert!(ensure_no_emergency_stop(&state).is_ok());

        state.status = Some(Arc::new(status(false)));
        assert!(ensure_no_emergency_stop(&state).is_ok());

        state.status = Some(Arc::new(status(true)));
        assert!(matches!(
            ensure_no_emergency_stop(&state),
            Err(CoreError::EmergencyStop)
        ));
    }

    #[test]
    fn schedule_uses_form_duration() {
        let form = WateringForm {
            duration_secs: 45,
            auto_mode: false,
            interval_hours: 12,
        };
        let schedule = form.schedule(true);
        assert_eq!(schedule.duration_seconds, 45);
        assert_eq!(schedule.interval_hours, 12);
        assert!(schedule.enabled);
    }
}
