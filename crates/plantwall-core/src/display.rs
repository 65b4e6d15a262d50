// ── Presentation helpers ──
//
// Small formatting rules shared by the CLI tables and the TUI screens.

use chrono::{DateTime, Utc};

/// Reservoir fill severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WaterLevel {
    Low,
    Medium,
    High,
}

impl WaterLevel {
    /// Classify a fill percentage: below 20 is low, below 40 medium.
    pub fn from_percent(level: f64) -> Self {
        if level < 20.0 {
            Self::Low
        } else if level < 40.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Age of `then` relative to `now`, e.g. `2h 5m ago` or `12m ago`.
///
/// Timestamps in the future read as `0m ago`.
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        format!("{hours}h {}m ago", minutes % 60)
    } else {
        format!("{minutes}m ago")
    }
}

/// Running/stopped indicator text.
pub fn run_state(running: bool) -> &'static str {
    if running { "Running" } else { "Stopped" }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn water_level_thresholds() {
        assert_eq!(WaterLevel::from_percent(0.0), WaterLevel::Low);
        assert_eq!(WaterLevel::from_percent(19.9), WaterLevel::Low);
        assert_eq!(WaterLevel::from_percent(20.0), WaterLevel::Medium);
        assert_eq!(WaterLevel::from_percent(39.9), WaterLevel::Medium);
        assert_eq!(WaterLevel::from_percent(40.0), WaterLevel::High);
    }

    #[test]
    fn relative_age_formats() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let recent = Utc.with_ymd_and_hms(2024, 6, 15, 11, 48, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2024, 6, 15, 9, 55, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
        assert_eq!(relative_age(recent, now), "12m ago");
        assert_eq!(relative_age(older, now), "2h 5m ago");
        assert_eq!(relative_age(future, now), "0m ago");
    }
}
