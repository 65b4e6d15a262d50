//! Data bridge: connects dashboard panel streams to TUI actions.
//!
//! Runs as a background task. Mounts every panel (initial fetch plus
//! background polling), then forwards each panel state change as an
//! [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use plantwall_core::Dashboard;

use crate::action::Action;

pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut overview = dashboard.overview().stream();
    let mut sensors = dashboard.sensors().stream();
    let mut lighting = dashboard.lighting().stream();
    let mut watering = dashboard.watering().stream();

    if let Err(e) = dashboard.mount().await {
        warn!(error = %e, "failed to mount dashboard");
        return;
    }

    let _ = action_tx.send(Action::RunHealthCheck);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(s) = overview.changed() => {
                let _ = action_tx.send(Action::OverviewUpdated(Box::new(s)));
            }
            Some(s) = sensors.changed() => {
                let _ = action_tx.send(Action::SensorsUpdated(Box::new(s)));
            }
            Some(s) = lighting.changed() => {
                let _ = action_tx.send(Action::LightingUpdated(Box::new(s)));
            }
            Some(s) = watering.changed() => {
                let _ = action_tx.send(Action::WateringUpdated(Box::new(s)));
            }
            else => break,
        }

        let _ = action_tx.send(Action::HealthUpdated(dashboard.system_health()));
    }

    debug!("data bridge shut down");
}
