//! Actuator command handlers.

use smappee_api::{ActuatorDuration, ActuatorId, ActuatorState};

use crate::cli::{ActuatorArgs, ActuatorCommand, GlobalOpts};
use crate::config::ProfileContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    ctx: &ProfileContext,
    args: ActuatorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (state, switch) = match args.command {
        ActuatorCommand::On(switch) => (ActuatorState::On, switch),
        ActuatorCommand::Off(switch) => (ActuatorState::Off, switch),
    };

    let location = ctx.location(switch.location.as_deref())?;
    let actuator = ActuatorId::new(switch.actuator);
    let duration = switch.duration.map(ActuatorDuration::from_secs);
    if let Some(d) = duration {
        if !d.is_timed() {
            tracing::warn!(
                seconds = d.as_secs(),
                "duration is not 300/900/1800/3600, the actuator switches indefinitely"
            );
        }
    }

    let mut client = ctx.cloud_client().await?;
    client
        .set_actuator(&location, &actuator, state, duration)
        .await?;

    let message = match duration {
        Some(d) if d.is_timed() => format!("Actuator {actuator} {state} for {}s", d.as_secs()),
        _ => format!("Actuator {actuator} {state}"),
    };
    output::success(global, &message);
    Ok(())
}
