// ── Backend wire types ──
//
// Shapes exchanged with the plant-wall backend. Status types are
// read-only snapshots; control types are partial write models where an
// absent field is omitted from the JSON body entirely.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Health ──────────────────────────────────────────────────────────

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ── System status ───────────────────────────────────────────────────

/// `GET /api/status`: whole-wall snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub timestamp: DateTime<Utc>,
    pub lighting_on: bool,
    pub water_level: f64,
    pub nutrient_level: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
}

// ── Lighting ────────────────────────────────────────────────────────

/// `GET /api/lighting`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingStatus {
    pub is_on: bool,
    /// Always within `0..=100`; out-of-range values fail decoding.
    #[serde(deserialize_with = "percent")]
    pub brightness: u8,
    pub power_usage: f64,
    pub schedule_enabled: bool,
    pub last_changed: DateTime<Utc>,
}

/// `POST /api/lighting` body. Only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingControl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<LightingSchedule>,
}

/// Daily on/off window, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingSchedule {
    #[serde(with = "hhmm")]
    pub on_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub off_time: NaiveTime,
    pub enabled: bool,
}

// ── Watering ────────────────────────────────────────────────────────

/// `GET /api/watering`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WateringStatus {
    pub is_running: bool,
    pub water_level: f64,
    pub last_watering: DateTime<Utc>,
    /// Set by the backend; while active no watering write is accepted.
    pub emergency_stop: bool,
    pub auto_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scheduled: Option<DateTime<Utc>>,
}

/// `POST /api/watering` body. Only supplied fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringControl {
    /// Manual run length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<WateringSchedule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringSchedule {
    pub interval_hours: u16,
    pub duration_seconds: u16,
    pub enabled: bool,
}

// ── Sensors ─────────────────────────────────────────────────────────

/// `GET /api/sensors`
///
/// The backend reports up to four soil moisture probes as flat
/// `soil_moisture_N` fields; the first is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture_0: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec_level: Option<f64>,
    pub light_level: f64,
    pub water_level: f64,
    pub timestamp: DateTime<Utc>,
}

impl SensorData {
    /// Reported soil moisture channels in probe order.
    pub fn soil_moisture_channels(&self) -> Vec<f64> {
        std::iter::once(Some(self.soil_moisture_0))
            .chain([
                self.soil_moisture_1,
                self.soil_moisture_2,
                self.soil_moisture_3,
            ])
            .flatten()
            .collect()
    }
}

// ── Health flags ────────────────────────────────────────────────────

/// Per-subsystem health flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub sensors: bool,
    pub watering: bool,
    pub lighting: bool,
    pub display: bool,
    pub overall: bool,
}

impl SystemHealth {
    /// Build from subsystem flags; `overall` holds only when all do.
    pub fn from_subsystems(sensors: bool, watering: bool, lighting: bool, display: bool) -> Self {
        Self {
            sensors,
            watering,
            lighting,
            display,
            overall: sensors && watering && lighting && display,
        }
    }
}

// ── Write acknowledgement ───────────────────────────────────────────

/// Response to a control POST. A weak acknowledgement only: it never
/// carries the post-update state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    /// Whether the acknowledgement matches one of the accepted tokens.
    pub fn is_one_of(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| *t == self.status)
    }
}

/// Error body some backend routes send alongside a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ── Serde helpers ───────────────────────────────────────────────────

/// Accepts integral or fractional JSON numbers, rounds, and rejects
/// anything outside `0..=100`.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !(0.0..=100.0).contains(&raw) {
        return Err(serde::de::Error::custom(format!(
            "percentage {raw} outside 0..=100"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    Ok(raw.round() as u8)
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
