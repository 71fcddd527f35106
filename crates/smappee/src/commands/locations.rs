//! Service location command handlers.

use serde_json::Value;
use tabled::Tabled;

use crate::cli::{GlobalOpts, LocationsArgs, LocationsCommand};
use crate::config::ProfileContext;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Monitor")]
    serial: String,
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn location_row(loc: &Value) -> LocationRow {
    LocationRow {
        id: field(loc, "serviceLocationId"),
        name: field(loc, "name"),
        serial: field(loc, "deviceSerialNumber"),
    }
}

pub async fn handle(
    ctx: &ProfileContext,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut client = ctx.cloud_client().await?;

    match args.command {
        LocationsCommand::List => {
            let data = client.get_service_locations().await?;
            let locations = data
                .get("serviceLocations")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let out = output::render_list(&global.output, &locations, location_row, |loc| {
                field(loc, "serviceLocationId")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LocationsCommand::Info { location } => {
            let location = ctx.location(location.as_deref())?;
            let info = client.get_service_location_info(&location).await?;
            let out = output::render_value(&global.output, &info);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
