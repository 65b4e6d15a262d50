//! Command dispatch: bridges CLI args -> dashboard panels -> output formatting.

pub mod config_cmd;
pub mod health;
pub mod lighting;
pub mod sensors;
pub mod status;
pub mod util;
pub mod watering;

use plantwall_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(dashboard, args, global).await,
        Command::Sensors => sensors::handle(dashboard, global).await,
        Command::Health => health::handle(dashboard, global).await,
        Command::Lighting(args) => lighting::handle(dashboard, args, global).await,
        Command::Watering(args) => watering::handle(dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend connection".into(),
        )),
    }
}
