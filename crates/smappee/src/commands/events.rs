//! Event command handler.

use smappee_api::ApplianceId;

use crate::cli::{EventsArgs, GlobalOpts};
use crate::config::ProfileContext;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    ctx: &ProfileContext,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let location = ctx.location(args.location.as_deref())?;
    let appliance = ApplianceId::new(args.appliance);
    let range = util::time_range(&args.window)?;

    let mut client = ctx.cloud_client().await?;
    let events = client
        .get_events(&location, &appliance, range, args.max)
        .await?;

    let out = output::render_value(&global.output, &events);
    output::print_output(&out, global.quiet);
    Ok(())
}
