//! Local gateway command handlers.

use serde_json::{Value, json};

use crate::cli::{CommandControlCommand, GlobalOpts, LocalArgs, LocalCommand, ResetTarget};
use crate::config::ProfileContext;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    ctx: &ProfileContext,
    args: LocalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = ctx.local_client(args.host.as_deref()).await?;

    let value: Value = match args.command {
        LocalCommand::Instantaneous => client.load_instantaneous().await?,
        LocalCommand::Report => client.report_instantaneous_values().await?,
        LocalCommand::Power => json!({ "activePowerKw": client.active_power().await? }),
        LocalCommand::Cosfi => json!({ "cosfi": client.active_cosfi().await? }),
        LocalCommand::Config { advanced: false } => client.load_config().await?,
        LocalCommand::Config { advanced: true } => client.load_advanced_config().await?,

        LocalCommand::SaveConfig { payload } => {
            if !util::confirm("Write configuration to the gateway?", global.yes)? {
                return Ok(());
            }
            Value::String(client.save_config(&payload).await?)
        }

        LocalCommand::CommandControl(cc) => match cc.command {
            CommandControlCommand::Show => client.load_command_control_config().await?,
            CommandControlCommand::Group => Value::String(client.send_group().await?),
            CommandControlCommand::Toggle { id } => {
                Value::String(client.on_off_command_control(&id).await?)
            }
            CommandControlCommand::Delete { id } => {
                if !util::confirm(&format!("Delete command control {id}?"), global.yes)? {
                    return Ok(());
                }
                Value::String(client.delete_command_control(&id).await?)
            }
            CommandControlCommand::DeleteTimers { id } => {
                Value::String(client.delete_command_control_timers(&id).await?)
            }
        },

        LocalCommand::Logs { name: None } => client.load_logfiles().await?,
        LocalCommand::Logs { name: Some(name) } => client.select_logfile(&name).await?,

        LocalCommand::Restart => {
            if !util::confirm("Restart the monitor?", global.yes)? {
                return Ok(());
            }
            let answer = client.restart().await?;
            output::success(global, "Restart requested");
            Value::String(answer)
        }

        LocalCommand::Reset { target } => {
            if !util::confirm(&format!("{}?", reset_label(target)), global.yes)? {
                return Ok(());
            }
            let answer = match target {
                ResetTarget::Peaks => client.reset_active_power_peaks().await?,
                ResetTarget::IpScanCache => client.reset_ip_scan_cache().await?,
                ResetTarget::SensorCache => client.reset_sensor_cache().await?,
                ResetTarget::Data => client.reset_data().await?,
                ResetTarget::Appliances => client.clear_appliances().await?,
            };
            output::success(global, reset_label(target));
            Value::String(answer)
        }
    };

    let out = output::render_value(&global.output, &value);
    output::print_output(&out, global.quiet);
    Ok(())
}

fn reset_label(target: ResetTarget) -> &'static str {
    match target {
        ResetTarget::Peaks => "Reset active power peaks",
        ResetTarget::IpScanCache => "Reset IP scan cache",
        ResetTarget::SensorCache => "Reset sensor cache",
        ResetTarget::Data => "Clear all recorded data",
        ResetTarget::Appliances => "Clear learned appliances",
    }
}
