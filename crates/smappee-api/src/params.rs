// ── Request parameters ──
//
// Identifiers, timestamps, aggregation levels and actuator durations as
// they cross the API boundary. Everything here is marshaled into query
// strings or small JSON bodies; nothing is validated against the remote
// API's rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::Error;

// ── Identifiers ─────────────────────────────────────────────────────

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }
    };
}

opaque_id!(
    /// A site (household, office) with its own meters and actuators.
    ServiceLocationId
);
opaque_id!(
    /// An appliance detected at a service location.
    ApplianceId
);
opaque_id!(
    /// A switchable load, e.g. a smart plug.
    ActuatorId
);
opaque_id!(
    /// A gas/water sensor attached to a service location.
    SensorId
);

// ── Aggregation ─────────────────────────────────────────────────────

/// Time-bucket granularity for consumption queries.
///
/// Unknown codes are kept as [`AggregationLevel::Other`] and sent to the
/// API as-is; the remote side decides what they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationLevel {
    /// 5-minute values, only available for the last 14 days.
    FiveMinutes,
    Hourly,
    Daily,
    Monthly,
    Quarterly,
    Other(i64),
}

impl AggregationLevel {
    /// Wire code sent as the `aggregation` query parameter.
    pub fn code(self) -> i64 {
        match self {
            Self::FiveMinutes => 1,
            Self::Hourly => 2,
            Self::Daily => 3,
            Self::Monthly => 4,
            Self::Quarterly => 5,
            Self::Other(code) => code,
        }
    }

    /// `false` for codes outside the documented 1..=5 range.
    pub fn is_documented(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<i64> for AggregationLevel {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::FiveMinutes,
            2 => Self::Hourly,
            3 => Self::Daily,
            4 => Self::Monthly,
            5 => Self::Quarterly,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for AggregationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FiveMinutes => f.write_str("5min"),
            Self::Hourly => f.write_str("hourly"),
            Self::Daily => f.write_str("daily"),
            Self::Monthly => f.write_str("monthly"),
            Self::Quarterly => f.write_str("quarterly"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for AggregationLevel {
    type Err = String;

    /// Accepts a level name (`5min`, `hourly`, ...) or a raw integer code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5min" | "five-minutes" | "fiveminutes" => Ok(Self::FiveMinutes),
            "hour" | "hourly" => Ok(Self::Hourly),
            "day" | "daily" => Ok(Self::Daily),
            "month" | "monthly" => Ok(Self::Monthly),
            "quarter" | "quarterly" => Ok(Self::Quarterly),
            other => other.parse::<i64>().map(Self::from).map_err(|_| {
                format!(
                    "unknown aggregation '{s}' (expected 5min, hourly, daily, monthly, quarterly or a number)"
                )
            }),
        }
    }
}

// ── Timestamps ──────────────────────────────────────────────────────

/// A point in time in any of the shapes callers commonly hold.
///
/// Every shape resolves to the same epoch-milliseconds integer for the
/// same instant. Index values of a [`ConsumptionTable`](crate::ConsumptionTable)
/// are zoned datetimes and convert through [`Timestamp::Instant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch, passed through unchanged.
    EpochMillis(i64),
    /// A calendar datetime with a known offset.
    Instant(DateTime<Utc>),
    /// A calendar datetime without zone, read in the system local timezone.
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Normalize to milliseconds since the Unix epoch.
    pub fn to_epoch_millis(&self) -> Result<i64, Error> {
        match self {
            Self::EpochMillis(ms) => Ok(*ms),
            Self::Instant(dt) => Ok(dt.timestamp_millis()),
            Self::Naive(naive) => match Local.from_local_datetime(naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    Ok(dt.timestamp_millis())
                }
                LocalResult::None => Err(Error::InvalidTimestamp {
                    message: format!("{naive} does not exist in the local timezone"),
                }),
            },
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self::EpochMillis(ms)
    }
}

/// Fractional milliseconds are truncated. The cast saturates: NaN becomes
/// `0`, and infinities or out-of-range values clamp to `i64::MIN`/`i64::MAX`.
impl From<f64> for Timestamp {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn from(ms: f64) -> Self {
        Self::EpochMillis(ms.trunc() as i64)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Instant(dt.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl FromStr for Timestamp {
    type Err = String;

    /// Parses epoch milliseconds, RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]`
    /// (local time) or a bare `YYYY-MM-DD` (local midnight).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ms) = s.parse::<i64>() {
            return Ok(Self::EpochMillis(ms));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.into());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::Naive(naive));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Naive(date.and_time(chrono::NaiveTime::MIN)));
        }
        Err(format!(
            "unrecognized timestamp '{s}' (use epoch milliseconds, RFC 3339 or YYYY-MM-DD[ HH:MM:SS])"
        ))
    }
}

/// Half-open query window `[start, end)` as understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(start: impl Into<Timestamp>, end: impl Into<Timestamp>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Both bounds as epoch milliseconds.
    pub fn to_epoch_millis(&self) -> Result<(i64, i64), Error> {
        Ok((self.start.to_epoch_millis()?, self.end.to_epoch_millis()?))
    }
}

// ── Actuators ───────────────────────────────────────────────────────

/// Target state of an actuator command, encoded as the last path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ActuatorState {
    On,
    Off,
}

/// How long an actuator command holds, in seconds.
///
/// The API honors 300, 900, 1800 and 3600; any other value switches the
/// actuator for an undetermined period. Values are sent unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorDuration(u32);

impl ActuatorDuration {
    pub const FIVE_MINUTES: Self = Self(300);
    pub const FIFTEEN_MINUTES: Self = Self(900);
    pub const HALF_HOUR: Self = Self(1800);
    pub const HOUR: Self = Self(3600);

    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// `true` for the durations the API treats as timed.
    pub fn is_timed(self) -> bool {
        matches!(self.0, 300 | 900 | 1800 | 3600)
    }
}

impl From<u32> for ActuatorDuration {
    fn from(secs: u32) -> Self {
        Self(secs)
    }
}

/// JSON body of an actuator on/off request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ActuatorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ActuatorDuration>,
}
