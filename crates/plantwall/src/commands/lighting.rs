//! Lighting command handlers.

use std::fmt::Write as _;

use plantwall_core::{Dashboard, LightingStatus};

use crate::cli::{GlobalOpts, LightingArgs, LightingCommand, LightingScheduleArgs};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::util;

fn detail(status: &LightingStatus, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Power:       {}", painter.flag(status.is_on, "ON", "OFF"));
    let _ = writeln!(out, "Brightness:  {}%", status.brightness);
    let _ = writeln!(out, "Power usage: {:.1} W", status.power_usage);
    let _ = writeln!(
        out,
        "Schedule:    {}",
        painter.flag(status.schedule_enabled, "enabled", "disabled")
    );
    let _ = write!(
        out,
        "Changed:     {}",
        util::timestamp_with_age(status.last_changed)
    );
    out
}

fn plain(status: &LightingStatus) -> String {
    format!(
        "is_on={}\nbrightness={}\npower_usage={}\nschedule_enabled={}",
        status.is_on, status.brightness, status.power_usage, status.schedule_enabled
    )
}

fn print_status(status: &LightingStatus, global: &GlobalOpts) {
    let painter = Painter::new(&global.color);
    let out = output::render_single(&global.output, status, |s| detail(s, painter), plain);
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: LightingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let panel = dashboard.lighting();

    // Every write builds on the server's view: seeds the form and the
    // toggle direction.
    let pb = util::spinner(global, "Fetching lighting status");
    let fetched = panel.refresh().await;
    pb.finish_and_clear();
    fetched?;

    let state = match args.command {
        LightingCommand::Show => panel.state(),

        LightingCommand::Brightness { value } => {
            panel.edit_form(|f| f.brightness = value)?;
            util::write_and_settle(dashboard, panel, global, "Setting brightness", || {
                panel.set_brightness()
            })
            .await?
        }

        LightingCommand::On => {
            util::write_and_settle(dashboard, panel, global, "Switching lights on", || {
                panel.set_power(true)
            })
            .await?
        }

        LightingCommand::Off => {
            util::write_and_settle(dashboard, panel, global, "Switching lights off", || {
                panel.set_power(false)
            })
            .await?
        }

        LightingCommand::Toggle => {
            util::write_and_settle(dashboard, panel, global, "Toggling lights", || {
                panel.toggle()
            })
            .await?
        }

        LightingCommand::Schedule(sched) => {
            apply_schedule_args(panel, &sched)?;
            util::write_and_settle(dashboard, panel, global, "Saving lighting schedule", || {
                panel.save_schedule()
            })
            .await?
        }
    };

    let status = util::require_status(&state)?;
    print_status(&status, global);
    Ok(())
}

fn apply_schedule_args(
    panel: &plantwall_core::LightingPanel,
    args: &LightingScheduleArgs,
) -> Result<(), CliError> {
    let on_time = args
        .on_time
        .as_deref()
        .map(|raw| util::parse_hhmm("on", raw))
        .transpose()?;
    let off_time = args
        .off_time
        .as_deref()
        .map(|raw| util::parse_hhmm("off", raw))
        .transpose()?;

    panel.edit_form(|f| {
        if let Some(t) = on_time {
            f.on_time = t;
        }
        if let Some(t) = off_time {
            f.off_time = t;
        }
        if let Some(b) = args.brightness {
            f.brightness = b;
        }
        if args.enable {
            f.schedule_enabled = true;
        } else if args.disable {
            f.schedule_enabled = false;
        }
    })?;
    Ok(())
}
