// Instantaneous readings
//
// The gateway reports live measurements as a flat list of
// `{ "key": ..., "value": ... }` pairs, values usually as strings.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::local::client::LocalClient;

/// One `{ key, value }` entry of a `loadInstantaneous` answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstantaneousValue {
    pub key: String,
    pub value: Value,
}

impl InstantaneousValue {
    /// The value as a number, whether sent as a JSON number or a numeric string.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl LocalClient {
    /// `GET reportInstantaneousValues`
    pub async fn report_instantaneous_values(&self) -> Result<Value, Error> {
        self.get_json("reportInstantaneousValues").await
    }

    /// `POST instantaneous` with `loadInstantaneous`
    pub async fn load_instantaneous(&self) -> Result<Value, Error> {
        self.post_json("instantaneous", Some("loadInstantaneous".into()))
            .await
    }

    /// [`load_instantaneous`](Self::load_instantaneous), decoded into entries.
    pub async fn instantaneous_values(&self) -> Result<Vec<InstantaneousValue>, Error> {
        let raw = self.load_instantaneous().await?;
        serde_json::from_value(raw.clone())
            .map_err(|e| Error::malformed(format!("unexpected instantaneous payload: {e}"), &raw.to_string()))
    }

    /// Total active power over all phases, in kW.
    ///
    /// Sum of every `*ActivePower` entry (reported in W) divided by 1000.
    pub async fn active_power(&self) -> Result<f64, Error> {
        let values = self.instantaneous_values().await?;
        Ok(total_active_power(&values))
    }

    /// Mean of every `*Cosfi` entry, `None` when the gateway reports none.
    pub async fn active_cosfi(&self) -> Result<Option<f64>, Error> {
        let values = self.instantaneous_values().await?;
        Ok(mean_cosfi(&values))
    }
}

fn numbers_with_suffix<'a>(
    values: &'a [InstantaneousValue],
    suffix: &'a str,
) -> impl Iterator<Item = f64> + 'a {
    values
        .iter()
        .filter(move |v| v.key.ends_with(suffix))
        .filter_map(InstantaneousValue::as_f64)
}

pub(crate) fn total_active_power(values: &[InstantaneousValue]) -> f64 {
    numbers_with_suffix(values, "ActivePower").sum::<f64>() / 1000.0
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean_cosfi(values: &[InstantaneousValue]) -> Option<f64> {
    let cosfi: Vec<f64> = numbers_with_suffix(values, "Cosfi").collect();
    if cosfi.is_empty() {
        return None;
    }
    Some(cosfi.iter().sum::<f64>() / cosfi.len() as f64)
}
