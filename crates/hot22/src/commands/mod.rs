//! Command dispatch: bridges CLI args -> `Dashboard` coordinators -> output.

pub mod analytics;
pub mod config_cmd;
pub mod errors;
pub mod files;
pub mod offices;
pub mod overview;
pub mod passengers;
pub mod search;
pub mod util;

use hot22_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Offices(args) => offices::handle(dashboard, args, global).await,
        Command::Passengers(args) => passengers::handle(dashboard, args, global).await,
        Command::Errors(args) => errors::handle(dashboard, args, global).await,
        Command::Files(args) => files::handle(dashboard, args, global).await,
        Command::Analytics(args) => analytics::handle(dashboard, args, global).await,
        Command::Search(args) => search::handle(dashboard, args, global).await,
        Command::Lookup(args) => search::lookup(dashboard, args, global).await,
        Command::Health => overview::health(dashboard, global).await,
        Command::Dashboard => overview::handle(dashboard, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "command does not use the API".into(),
        }),
    }
}
