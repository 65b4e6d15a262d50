//! System status handlers, including `--watch`.

use std::fmt::Write as _;

use futures_util::StreamExt;

use plantwall_core::{Dashboard, SystemStatus};

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

fn detail(status: &SystemStatus, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Updated:       {}", util::timestamp_with_age(status.timestamp));
    let _ = writeln!(
        out,
        "Lighting:      {}",
        painter.flag(status.lighting_on, "ON", "OFF")
    );
    let _ = writeln!(out, "Water level:   {}", painter.water_level(status.water_level));
    let _ = writeln!(out, "Nutrients:     {:.1}%", status.nutrient_level);
    let _ = writeln!(out, "Temperature:   {:.1} °C", status.temperature);
    let _ = writeln!(out, "Humidity:      {:.1}%", status.humidity);
    let _ = write!(out, "Soil moisture: {:.1}%", status.soil_moisture);
    out
}

fn plain(status: &SystemStatus) -> String {
    format!(
        "lighting_on={}\nwater_level={}\nnutrient_level={}\ntemperature={}\nhumidity={}\nsoil_moisture={}",
        status.lighting_on,
        status.water_level,
        status.nutrient_level,
        status.temperature,
        status.humidity,
        status.soil_moisture,
    )
}

fn render(status: &SystemStatus, global: &GlobalOpts) -> String {
    let painter = Painter::new(&global.color);
    output::render_single(&global.output, status, |s| detail(s, painter), plain)
}

pub async fn handle(
    dashboard: &Dashboard,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.watch {
        return watch(dashboard, global).await;
    }

    let panel = dashboard.overview();
    let pb = util::spinner(global, "Fetching system status");
    let fetched = panel.refresh().await;
    pb.finish_and_clear();
    fetched?;

    let status = util::require_status(&panel.state())?;
    output::print_output(&render(&status, global), global.quiet);
    Ok(())
}

/// Mount the overview panel and print every new snapshot until Ctrl-C.
async fn watch(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(&global.color);
    let subscription = dashboard.overview().mount()?;
    let mut changes = subscription.panel().stream().into_stream();
    let mut last_seen = None;
    let mut last_error: Option<String> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = changes.next() => {
                let Some(state) = next else { break };

                if let Some(err) = state.error() {
                    if last_error.as_deref() != Some(err) {
                        output::print_note(&painter.bad(err), global.quiet);
                        last_error = Some(err.to_owned());
                    }
                    continue;
                }
                last_error = None;

                if state.last_refresh == last_seen {
                    continue;
                }
                last_seen = state.last_refresh;
                if let Some(status) = state.status.as_deref() {
                    output::print_output(&render(status, global), global.quiet);
                    if !global.quiet && matches!(global.output, OutputFormat::Table) {
                        println!();
                    }
                }
            }
        }
    }

    subscription.unmount().await;
    Ok(())
}
