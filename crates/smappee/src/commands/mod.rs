//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod actuator;
pub mod config_cmd;
pub mod consumption;
pub mod events;
pub mod local;
pub mod locations;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::ProfileContext;
use crate::error::CliError;

/// Dispatch a profile-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &ProfileContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Locations(args) => locations::handle(ctx, args, global).await,
        Command::Consumption(args) => consumption::handle(ctx, args, global).await,
        Command::Events(args) => events::handle(ctx, args, global).await,
        Command::Actuator(args) => actuator::handle(ctx, args, global).await,
        Command::Local(args) => local::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
