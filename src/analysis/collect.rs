// src/analysis/collect.rs

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::{Config, PairingKey};
use crate::error::{FedError, Result};
use crate::model::SimulationRecord;

/// Energy sample of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: i64,
    /// Excess electrons relative to the neutral configuration.
    pub charge: f64,
    pub energy: f64,
    /// Cell area (cm^2)
    pub area: f64,
    /// Value of the pairing field when pairing by key/value pair.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollectedData {
    /// Samples grouped by state label, in record order.
    pub groups: BTreeMap<String, Vec<Sample>>,
    /// Summed dFdG of the last record that carried one.
    pub charge_transfer: Option<f64>,
    /// Records without an energy.
    pub skipped: Vec<i64>,
}

impl CollectedData {
    pub fn group(&self, state: &str) -> &[Sample] {
        self.groups.get(state).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Groups records by state, computing implicit charges and cell areas.
pub fn collect(records: &[SimulationRecord], cfg: &Config) -> Result<CollectedData> {
    let mut out = CollectedData::default();

    for record in records {
        if let Some(q) = record.charge_transfer() {
            out.charge_transfer = Some(q);
        }

        let Some(energy) = record.energy else {
            log::debug!("Record {} has no energy, skipped", record.id);
            out.skipped.push(record.id);
            continue;
        };

        let state = record.get_str(&cfg.state_key)?;
        let total = record.get_f64(&cfg.charge_key)?;
        let neutral = record.structure.neutral_electrons(&cfg.valence_overrides)?;

        let area = record.structure.area_cm2();
        if !(area.is_finite() && area > 0.0) {
            return Err(FedError::DegenerateCell { id: record.id, area });
        }

        let tag = match &cfg.pairing.key {
            PairingKey::ImplicitCharge => None,
            PairingKey::Field(name) => Some(match record.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => {
                    return Err(FedError::MissingKey {
                        id: record.id,
                        key: name.clone(),
                    })
                }
            }),
        };

        out.groups.entry(state.to_string()).or_default().push(Sample {
            id: record.id,
            charge: total - neutral,
            energy,
            area,
            tag,
        });
    }

    Ok(out)
}
