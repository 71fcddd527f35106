//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::Utc;
use smappee_api::{AggregationLevel, TimeRange, Timestamp};

use crate::cli::WindowArgs;
use crate::error::CliError;

/// Parse a `--from` / `--to` value.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<Timestamp, CliError> {
    raw.parse().map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// Build the query window; a missing `--to` means now.
pub fn time_range(window: &WindowArgs) -> Result<TimeRange, CliError> {
    let start = parse_timestamp("from", &window.from)?;
    let end = match window.to.as_deref() {
        Some(raw) => parse_timestamp("to", raw)?,
        None => Timestamp::from(Utc::now()),
    };
    Ok(TimeRange::new(start, end))
}

/// Parse `--aggregation`, warning on codes the API doesn't document.
pub fn parse_aggregation(raw: &str) -> Result<AggregationLevel, CliError> {
    let level: AggregationLevel = raw.parse().map_err(|reason| CliError::Validation {
        field: "aggregation".into(),
        reason,
    })?;
    if !level.is_documented() {
        tracing::warn!(code = level.code(), "undocumented aggregation level, sending as-is");
    }
    Ok(level)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
