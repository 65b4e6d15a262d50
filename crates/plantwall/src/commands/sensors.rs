//! Sensor readings handler.

use tabled::{Table, Tabled, settings::Style};

use plantwall_core::{Dashboard, SensorData};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn reading(sensor: impl Into<String>, value: String) -> ReadingRow {
    ReadingRow {
        sensor: sensor.into(),
        value,
    }
}

fn rows(data: &SensorData) -> Vec<ReadingRow> {
    let mut rows = vec![
        reading("Temperature", format!("{:.1} °C", data.temperature)),
        reading("Humidity", format!("{:.1}%", data.humidity)),
    ];
    for (i, level) in data.soil_moisture_channels().into_iter().enumerate() {
        rows.push(reading(format!("Soil moisture #{}", i + 1), format!("{level:.1}%")));
    }
    if let Some(ph) = data.ph_level {
        rows.push(reading("pH", format!("{ph:.2}")));
    }
    if let Some(ec) = data.ec_level {
        rows.push(reading("EC", format!("{ec:.2} mS/cm")));
    }
    rows.push(reading("Light", format!("{:.0} lux", data.light_level)));
    rows.push(reading("Water level", format!("{:.1}%", data.water_level)));
    rows
}

fn detail(data: &SensorData) -> String {
    let table = Table::new(rows(data)).with(Style::rounded()).to_string();
    format!("{table}\nRead {}", util::timestamp_with_age(data.timestamp))
}

fn plain(data: &SensorData) -> String {
    let mut lines = vec![
        format!("temperature={}", data.temperature),
        format!("humidity={}", data.humidity),
    ];
    for (i, level) in data.soil_moisture_channels().into_iter().enumerate() {
        lines.push(format!("soil_moisture_{i}={level}"));
    }
    if let Some(ph) = data.ph_level {
        lines.push(format!("ph_level={ph}"));
    }
    if let Some(ec) = data.ec_level {
        lines.push(format!("ec_level={ec}"));
    }
    lines.push(format!("light_level={}", data.light_level));
    lines.push(format!("water_level={}", data.water_level));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let panel = dashboard.sensors();
    let pb = util::spinner(global, "Reading sensors");
    let fetched = panel.refresh().await;
    pb.finish_and_clear();
    fetched?;

    let data = util::require_status(&panel.state())?;
    let out = output::render_single(&global.output, data.as_ref(), detail, plain);
    output::print_output(&out, global.quiet);
    Ok(())
}
