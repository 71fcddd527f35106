//! Consumption command handler.

use smappee_api::SensorId;

use crate::cli::{ConsumptionArgs, GlobalOpts};
use crate::config::ProfileContext;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    ctx: &ProfileContext,
    args: ConsumptionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let location = ctx.location(args.location.as_deref())?;
    let range = util::time_range(&args.window)?;
    let aggregation = util::parse_aggregation(&args.aggregation)?;
    let sensor = args.sensor.map(SensorId::new);

    let mut client = ctx.cloud_client().await?;

    let out = if args.raw {
        let data = match sensor {
            Some(ref sensor) => {
                client
                    .get_sensor_consumption(&location, sensor, range, aggregation)
                    .await?
            }
            None => client.get_consumption(&location, range, aggregation).await?,
        };
        output::render_value(&global.output, &data)
    } else {
        let table = client
            .get_consumption_table(&location, sensor.as_ref(), range, aggregation, args.localize)
            .await?;
        if table.is_empty() {
            tracing::info!(%location, "no consumption records in window");
        }
        output::render_consumption(&global.output, &table)
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
