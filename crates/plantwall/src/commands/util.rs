//! Shared helpers for command handlers.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use plantwall_core::display::relative_age;
use plantwall_core::{ControlKind, CoreError, Dashboard, Panel, PanelState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Painter};

/// Spinner on stderr while waiting on the backend. Hidden when quiet or
/// when stderr is not a terminal.
pub fn spinner(global: &GlobalOpts, label: &str) -> ProgressBar {
    if global.quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run one control write, then wait for the post-write re-fetch so the
/// state handed back is what the backend reports.
pub async fn write_and_settle<K, F, Fut>(
    dashboard: &Dashboard,
    panel: &Panel<K>,
    global: &GlobalOpts,
    label: &str,
    write: F,
) -> Result<PanelState<K>, CliError>
where
    K: ControlKind,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
{
    let painter = Painter::new(&global.color);
    let since = panel.state().last_refresh;
    let pb = spinner(global, label);

    if let Err(e) = write().await {
        pb.finish_and_clear();
        let banner = panel.state().error().map(str::to_owned);
        return Err(match (e, banner) {
            (CoreError::EmergencyStop, Some(message)) => CliError::EmergencyStop { message },
            (CoreError::UnexpectedResponse { .. }, Some(message)) => {
                CliError::Rejected { message }
            }
            (e, _) => e.into(),
        });
    }
    let message = panel.state().message().map(str::to_owned);

    let wait = panel.config().settle_delay + dashboard.config().timeout;
    let settled = tokio::time::timeout(wait, panel.settled(since)).await;
    pb.finish_and_clear();

    if let Some(m) = message {
        output::print_note(&painter.good(&format!("✓ {m}")), global.quiet);
    }

    let state = settled.map_err(|_| CliError::Timeout {
        seconds: wait.as_secs(),
    })??;
    if let Some(err) = state.error() {
        output::print_note(&painter.warn(&format!("! {err}")), global.quiet);
    }
    Ok(state)
}

/// Ask for confirmation unless `--yes` was given.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse an `HH:MM` schedule time.
pub fn parse_hhmm(field: &str, raw: &str) -> Result<NaiveTime, CliError> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected HH:MM, got '{raw}'"),
    })
}

/// Absolute timestamp plus relative age, e.g. `2024-06-15 06:00 UTC (2h 5m ago)`.
pub fn timestamp_with_age(at: DateTime<Utc>) -> String {
    format!(
        "{} ({})",
        at.format("%Y-%m-%d %H:%M UTC"),
        relative_age(at, Utc::now())
    )
}

/// Status payload of a panel that has completed a fetch.
pub fn require_status<K: plantwall_core::PanelKind>(
    state: &PanelState<K>,
) -> Result<std::sync::Arc<K::Status>, CliError> {
    state.status.clone().ok_or_else(|| {
        CliError::Internal(
            state
                .error()
                .map_or_else(|| "no data received from backend".to_owned(), str::to_owned),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hhmm_parsing() {
        assert_eq!(
            parse_hhmm("on", "06:30").ok(),
            NaiveTime::from_hms_opt(6, 30, 0)
        );
        assert!(matches!(
            parse_hhmm("on", "6pm"),
            Err(CliError::Validation { .. })
        ));
    }
}
