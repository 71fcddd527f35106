// Consumption responses as time-indexed tables.
//
// Pure post-processing: no network I/O. The location endpoint names its
// record list `consumptions`, the sensor endpoint `records`; both carry an
// epoch-milliseconds `timestamp` per record plus measurement columns.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::Error;

/// How the table index is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Localization {
    /// UTC, without timezone semantics.
    #[default]
    Naive,
    /// The system local timezone.
    System,
    /// A named IANA timezone (e.g. the service location's).
    Zone(Tz),
}

impl Localization {
    fn apply(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Naive => instant.fixed_offset(),
            Self::System => instant.with_timezone(&Local).fixed_offset(),
            Self::Zone(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }

    fn is_localized(&self) -> bool {
        !matches!(self, Self::Naive)
    }
}

/// Column-oriented consumption data indexed by record timestamp.
///
/// Rows keep the order of the records in the response. Columns appear in
/// the order they are first seen; a record lacking a column gets `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsumptionTable {
    index: Vec<DateTime<FixedOffset>>,
    columns: IndexMap<String, Vec<Value>>,
    localized: bool,
}

impl ConsumptionTable {
    /// Build a table from a consumption or sensor-consumption response.
    ///
    /// Accepts the full response object or a bare list of records.
    pub fn from_response(response: &Value, localization: &Localization) -> Result<Self, Error> {
        let records: &[Value] = match response {
            Value::Array(records) => records,
            Value::Object(obj) => match obj.get("consumptions").or_else(|| obj.get("records")) {
                Some(Value::Array(records)) => records,
                Some(Value::Null) | None => &[],
                Some(_) => {
                    return Err(Error::malformed(
                        "consumption records are not a list",
                        &response.to_string(),
                    ));
                }
            },
            _ => {
                return Err(Error::malformed(
                    "consumption response is not an object",
                    &response.to_string(),
                ));
            }
        };

        let mut table = Self {
            localized: localization.is_localized(),
            ..Self::default()
        };
        for record in records {
            table.push_record(record, localization)?;
        }
        Ok(table)
    }

    fn push_record(&mut self, record: &Value, localization: &Localization) -> Result<(), Error> {
        let fields = record
            .as_object()
            .ok_or_else(|| Error::malformed("consumption record is not an object", &record.to_string()))?;

        let instant = fields
            .get("timestamp")
            .and_then(Value::as_i64)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| {
                Error::malformed("consumption record has no valid timestamp", &record.to_string())
            })?;

        let row = self.index.len();
        for (key, value) in fields {
            if key == "timestamp" {
                continue;
            }
            self.columns
                .entry(key.clone())
                .or_insert_with(|| vec![Value::Null; row])
                .push(value.clone());
        }
        for column in self.columns.values_mut() {
            if column.len() == row {
                column.push(Value::Null);
            }
        }
        self.index.push(localization.apply(instant));
        Ok(())
    }

    /// Re-express the index in another timezone. Instants are unchanged.
    pub fn localize(mut self, localization: &Localization) -> Self {
        for ts in &mut self.index {
            *ts = localization.apply(ts.with_timezone(&Utc));
        }
        self.localized = localization.is_localized();
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// `false` for a UTC index without timezone semantics.
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    pub fn index(&self) -> &[DateTime<FixedOffset>] {
        &self.index
    }

    /// Wall-clock index values, dropping the offset.
    pub fn naive_index(&self) -> Vec<NaiveDateTime> {
        self.index.iter().map(DateTime::naive_local).collect()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Row `i` as `(timestamp, cells in column order)`.
    pub fn row(&self, i: usize) -> Option<(DateTime<FixedOffset>, Vec<&Value>)> {
        let ts = *self.index.get(i)?;
        let cells = self
            .columns
            .values()
            .map(|column| column.get(i).unwrap_or(&Value::Null))
            .collect();
        Some((ts, cells))
    }

    /// Rows as JSON objects, the index rendered as an RFC 3339 `timestamp`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        (0..self.len())
            .filter_map(|i| self.row(i))
            .map(|(ts, cells)| {
                let mut record = Map::new();
                record.insert("timestamp".into(), Value::String(ts.to_rfc3339()));
                for (name, cell) in self.column_names().zip(cells) {
                    record.insert(name.to_owned(), cell.clone());
                }
                record
            })
            .collect()
    }
}
