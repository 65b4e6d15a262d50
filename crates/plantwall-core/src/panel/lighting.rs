// ── Lighting panel operations ──

use chrono::NaiveTime;

use plantwall_api::{LightingControl, LightingSchedule};

use super::kind::Lighting;
use super::Panel;
use crate::error::CoreError;

/// Draft lighting settings, seeded once from the first fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightingForm {
    pub brightness: u8,
    pub schedule_enabled: bool,
    pub on_time: NaiveTime,
    pub off_time: NaiveTime,
}

impl Default for LightingForm {
    fn default() -> Self {
        Self {
            brightness: 50,
            schedule_enabled: false,
            on_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            off_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
        }
    }
}

impl LightingForm {
    pub fn schedule(&self) -> LightingSchedule {
        LightingSchedule {
            on_time: self.on_time,
            off_time: self.off_time,
            enabled: self.schedule_enabled,
        }
    }
}

impl Panel<Lighting> {
    /// Submit the form's brightness on its own.
    pub async fn set_brightness(&self) -> Result<(), CoreError> {
        self.submit(
            "update brightness",
            |s| {
                Ok(LightingControl {
                    brightness: Some(s.form.brightness),
                    ..LightingControl::default()
                })
            },
            |_, control| {
                format!("Brightness set to {}%", control.brightness.unwrap_or_default())
            },
        )
        .await
    }

    /// Flip the lights relative to the last fetched state.
    pub async fn toggle(&self) -> Result<(), CoreError> {
        self.switch(None).await
    }

    /// Switch the lights to an explicit state.
    pub async fn set_power(&self, on: bool) -> Result<(), CoreError> {
        self.switch(Some(on)).await
    }

    async fn switch(&self, target: Option<bool>) -> Result<(), CoreError> {
        self.submit(
            "toggle lighting",
            |s| {
                let is_on = s.status.as_ref().is_some_and(|st| st.is_on);
                Ok(LightingControl {
                    enabled: Some(target.unwrap_or(!is_on)),
                    ..LightingControl::default()
                })
            },
            |_, control| {
                if control.enabled == Some(true) {
                    "Lights switched on".to_owned()
                } else {
                    "Lights switched off".to_owned()
                }
            },
        )
        .await
    }

    /// Submit brightness together with the daily schedule.
    pub async fn save_schedule(&self) -> Result<(), CoreError> {
        self.submit(
            "update lighting",
            |s| {
                Ok(LightingControl {
                    brightness: Some(s.form.brightness),
                    enabled: None,
                    schedule: Some(s.form.schedule()),
                })
            },
            |_, _| "Lighting settings updated successfully!".to_owned(),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::panel::PanelKind;
    use chrono::{TimeZone, Utc};
    use plantwall_api::LightingStatus;

    #[test]
    fn default_schedule_is_seven_to_eight() {
        let form = LightingForm::default();
        assert_eq!(form.on_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(form.off_time, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(form.brightness, 50);
    }

    #[test]
    fn seeding_copies_brightness_and_schedule_flag() {
        let status = LightingStatus {
            is_on: true,
            brightness: 80,
            power_usage: 40.0,
            schedule_enabled: true,
            last_changed: Utc.with_ymd_and_hms(2024, 6, 15, 7, 0, 0).unwrap(),
        };
        let mut form = LightingForm::default();
        Lighting::seed(&mut form, &status);
        assert_eq!(form.brightness, 80);
        assert!(form.schedule_enabled);
        assert_eq!(form.on_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    }
}
