// src/model/record.rs

use serde_json::{Map, Value};

use crate::error::{FedError, Result};
use crate::model::Structure;

/// One row of the simulation database.
#[derive(Clone, Debug)]
pub struct SimulationRecord {
    pub id: i64,
    pub structure: Structure,
    /// Total energy (eV), `None` when the calculation never produced one.
    pub energy: Option<f64>,
    pub key_value_pairs: Map<String, Value>,
    pub data: Value,
}

impl SimulationRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.key_value_pairs.get(key)
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(key))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(key))
    }

    /// True when `key` holds exactly `expected`.
    pub fn matches(&self, key: &str, expected: &str) -> bool {
        self.get(key).and_then(Value::as_str) == Some(expected)
    }

    /// Sum of `data.extrapolation.dFdG`, scalar or (nested) array.
    pub fn charge_transfer(&self) -> Option<f64> {
        let value = self.data.get("extrapolation")?.get("dFdG")?;
        sum_numbers(value)
    }

    fn missing(&self, key: &str) -> FedError {
        FedError::MissingKey {
            id: self.id,
            key: key.to_string(),
        }
    }
}

fn sum_numbers(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Array(items) => items.iter().map(sum_numbers).sum(),
        _ => None,
    }
}
