// src/io/ase_json.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::ase_codec;
use super::RecordStore;
use crate::error::{FedError, Result};
use crate::model::{SimulationRecord, Structure};

/// ASE JSON database: `{"1": {...}, "2": {...}, "ids": [1, 2], "nextid": 3}`.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RecordStore for JsonStore {
    fn records(&self) -> Result<Vec<SimulationRecord>> {
        let text = fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&text)?;
        parse_database(&root)
    }
}

pub fn parse_database(root: &Value) -> Result<Vec<SimulationRecord>> {
    let Some(table) = root.as_object() else {
        return Ok(Vec::new());
    };

    // Prefer the explicit id list, fall back to every numeric key.
    let mut ids: Vec<i64> = match table.get("ids").and_then(Value::as_array) {
        Some(list) => list.iter().filter_map(Value::as_i64).collect(),
        None => table.keys().filter_map(|k| k.parse().ok()).collect(),
    };
    ids.sort_unstable();

    ids.into_iter()
        .filter_map(|id| table.get(&id.to_string()).map(|row| (id, row)))
        .map(|(id, row)| parse_row(id, row))
        .collect()
}

fn parse_row(id: i64, row: &Value) -> Result<SimulationRecord> {
    let malformed = move |field: &'static str| move |reason: String| FedError::MalformedBlob { id, field, reason };

    let numbers = match row.get("numbers") {
        Some(v) => {
            let v = ase_codec::resolve(v.clone(), None).map_err(malformed("numbers"))?;
            ase_codec::flatten_f64(&v)
                .map_err(malformed("numbers"))?
                .into_iter()
                .map(|z| z as u32)
                .collect()
        }
        None => Vec::new(),
    };

    let positions = match row.get("positions") {
        Some(v) => ase_codec::resolve(v.clone(), None)
            .and_then(|v| ase_codec::flatten_f64(&v))
            .and_then(|flat| ase_codec::triples(&flat))
            .map_err(malformed("positions"))?,
        None => Vec::new(),
    };

    let lattice = match row.get("cell") {
        Some(v) => {
            // newer ASE wraps the matrix as {"array": ..., "pbc": ...}
            let v = v.get("array").unwrap_or(v);
            ase_codec::resolve(v.clone(), None)
                .and_then(|v| ase_codec::flatten_f64(&v))
                .and_then(|flat| ase_codec::lattice_from_flat(&flat))
                .map_err(malformed("cell"))?
        }
        None => [[0.0; 3]; 3],
    };

    let energy = row.get("energy").and_then(Value::as_f64);

    let key_value_pairs = match row.get("key_value_pairs") {
        Some(v) => match ase_codec::resolve(v.clone(), None).map_err(malformed("key_value_pairs"))? {
            Value::Object(map) => map,
            _ => return Err(malformed("key_value_pairs")("not an object".to_string())),
        },
        None => Map::new(),
    };

    let data = match row.get("data") {
        Some(v) => ase_codec::resolve(v.clone(), None).map_err(malformed("data"))?,
        None => Value::Null,
    };

    Ok(SimulationRecord {
        id,
        structure: Structure::from_numbers(lattice, &numbers, &positions)?,
        energy,
        key_value_pairs,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_database() {
        let db = json!({
            "2": {
                "numbers": [27, 6, 8],
                "positions": [[0.0, 0.0, 0.0], [0.0, 0.0, 1.9], [0.0, 0.0, 3.0]],
                "cell": {"array": {"__ndarray__": [[3, 3], "float64", [10, 0, 0, 0, 10, 0, 0, 0, 20]]}, "pbc": [true, true, true]},
                "key_value_pairs": {"states": "state_implicit_CO", "tot_charge": 25.0},
                "data": {"extrapolation": {"dFdG": {"__ndarray__": [[2], "float64", [-0.1, -0.2]]}}}
            },
            "1": {
                "numbers": {"__ndarray__": [[1], "int64", [27]]},
                "cell": [[10, 0, 0], [0, 10, 0], [0, 0, 20]],
                "energy": -100.5,
                "key_value_pairs": {"states": "state_implicit_slab", "tot_charge": 9.0}
            },
            "ids": [1, 2],
            "nextid": 3
        });

        let records = parse_database(&db).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].energy, Some(-100.5));
        assert_eq!(records[0].structure.atoms[0].element, "Co");
        assert_eq!(records[1].energy, None);
        assert_eq!(records[1].structure.lattice[2], [0.0, 0.0, 20.0]);
        assert_eq!(records[1].structure.atoms[1].position, [0.0, 0.0, 1.9]);
        assert!((records[1].charge_transfer().unwrap() + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_bad_cell() {
        let db = json!({"1": {"numbers": [1], "cell": [1.0, 2.0]}});
        let err = parse_database(&db).unwrap_err();
        assert!(matches!(err, FedError::MalformedBlob { field: "cell", .. }));
    }
}
