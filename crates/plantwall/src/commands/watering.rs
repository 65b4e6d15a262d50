//! Watering command handlers.

use std::fmt::Write as _;

use plantwall_core::display::run_state;
use plantwall_core::{Dashboard, WateringStatus};

use crate::cli::{GlobalOpts, WateringArgs, WateringCommand};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

fn detail(status: &WateringStatus, painter: Painter) -> String {
    let mut out = String::new();
    if status.emergency_stop {
        let _ = writeln!(out, "{}", painter.bad("EMERGENCY STOP ACTIVE"));
    }
    let _ = writeln!(
        out,
        "Pump:          {}",
        painter.flag(status.is_running, run_state(true), run_state(false))
    );
    let _ = writeln!(out, "Water level:   {}", painter.water_level(status.water_level));
    let _ = writeln!(
        out,
        "Auto mode:     {}",
        painter.flag(status.auto_mode, "enabled", "disabled")
    );
    let _ = writeln!(
        out,
        "Last watering: {}",
        util::timestamp_with_age(status.last_watering)
    );
    let next = status
        .next_scheduled
        .map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string());
    let _ = write!(out, "Next run:      {next}");
    out
}

fn plain(status: &WateringStatus) -> String {
    format!(
        "is_running={}\nwater_level={}\nauto_mode={}\nemergency_stop={}",
        status.is_running, status.water_level, status.auto_mode, status.emergency_stop
    )
}

fn print_status(status: &WateringStatus, global: &GlobalOpts) {
    let painter = Painter::new(&global.color);
    let out = output::render_single(&global.output, status, |s| detail(s, painter), plain);
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: WateringArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let panel = dashboard.watering();

    // The emergency-stop guard and auto-mode seed both come from this fetch.
    let pb = util::spinner(global, "Fetching watering status");
    let fetched = panel.refresh().await;
    pb.finish_and_clear();
    fetched?;

    let state = match args.command {
        WateringCommand::Show => panel.state(),

        WateringCommand::Start { duration } => {
            panel.edit_form(|f| f.duration_secs = duration)?;
            util::write_and_settle(dashboard, panel, global, "Starting watering", || {
                panel.start_manual()
            })
            .await?
        }

        WateringCommand::Auto { state } => {
            let label = if state.is_on() {
                "Enabling auto mode"
            } else {
                "Disabling auto mode"
            };
            util::write_and_settle(dashboard, panel, global, label, || {
                panel.set_auto_mode(state.is_on())
            })
            .await?
        }

        WateringCommand::Schedule(sched) => {
            panel.edit_form(|f| {
                if let Some(hours) = sched.interval {
                    f.interval_hours = hours;
                }
                if let Some(secs) = sched.duration {
                    f.duration_secs = secs;
                }
            })?;
            util::write_and_settle(dashboard, panel, global, "Saving watering schedule", || {
                panel.save_schedule()
            })
            .await?
        }
    };

    let status = util::require_status(&state)?;
    print_status(&status, global);
    Ok(())
}
