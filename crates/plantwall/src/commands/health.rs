//! Backend health handler.

use std::fmt::Write as _;

use serde::Serialize;

use plantwall_core::{Dashboard, HealthCheck, HealthStatus, SystemHealth};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Painter};

#[derive(Serialize)]
struct HealthReport {
    backend: Option<HealthStatus>,
    message: String,
    subsystems: SystemHealth,
}

fn detail(report: &HealthReport, painter: Painter) -> String {
    let mut out = String::new();
    let headline = if report.backend.is_some() {
        painter.good(&report.message)
    } else {
        painter.bad(&report.message)
    };
    let _ = writeln!(out, "{headline}");
    if let Some(version) = report.backend.as_ref().and_then(|b| b.version.as_deref()) {
        let _ = writeln!(out, "Version:  {version}");
    }
    let s = report.subsystems;
    for (name, ok) in [
        ("Sensors", s.sensors),
        ("Watering", s.watering),
        ("Lighting", s.lighting),
        ("Display", s.display),
    ] {
        let _ = writeln!(out, "{name:<9} {}", painter.flag(ok, "ok", "degraded"));
    }
    let _ = write!(out, "{:<9} {}", "Overall", painter.flag(s.overall, "ok", "degraded"));
    out
}

fn plain(report: &HealthReport) -> String {
    let s = report.subsystems;
    format!(
        "backend={}\nsensors={}\nwatering={}\nlighting={}\ndisplay={}\noverall={}",
        report.backend.as_ref().map_or("unavailable", |b| b.status.as_str()),
        s.sensors,
        s.watering,
        s.lighting,
        s.display,
        s.overall,
    )
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let (check, refreshed) = tokio::join!(dashboard.check_health(), dashboard.refresh_all());
    if let Err(e) = refreshed {
        tracing::debug!(error = %e, "panel refresh failed during health check");
    }

    let message = check.message();
    let (backend, failure) = match check {
        HealthCheck::Healthy(status) => (Some(status), None),
        HealthCheck::Unavailable(err) => (None, Some(err)),
    };
    let report = HealthReport {
        backend,
        message,
        subsystems: dashboard.system_health(),
    };

    let painter = Painter::new(&global.color);
    let out = output::render_single(&global.output, &report, |r| detail(r, painter), plain);
    output::print_output(&out, global.quiet);

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
