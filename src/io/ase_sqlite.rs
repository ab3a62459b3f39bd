// src/io/ase_sqlite.rs

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use serde_json::{Map, Value};

use super::ase_codec;
use super::RecordStore;
use crate::error::{FedError, Result};
use crate::model::{SimulationRecord, Structure};

const SELECT_ROWS: &str =
    "SELECT id, numbers, positions, cell, energy, key_value_pairs, data FROM systems ORDER BY id";

/// ASE SQLite database (`.db`).
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RecordStore for SqliteStore {
    fn records(&self) -> Result<Vec<SimulationRecord>> {
        // Connection lives for this call only.
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(SELECT_ROWS)?;
        let mut rows = stmt.query([])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_row(row)?);
        }
        log::debug!("Read {} rows from {:?}", records.len(), self.path);
        Ok(records)
    }
}

fn parse_row(row: &Row) -> Result<SimulationRecord> {
    let id: i64 = row.get(0)?;
    let malformed = move |field: &'static str| move |reason: String| FedError::MalformedBlob { id, field, reason };

    let numbers = match row.get_ref(1)? {
        ValueRef::Blob(b) => ase_codec::i32s_from_le(b).map_err(malformed("numbers"))?,
        ValueRef::Null => Vec::new(),
        _ => return Err(malformed("numbers")("not a blob".to_string())),
    };
    let numbers = numbers
        .into_iter()
        .map(|z| u32::try_from(z).map_err(|_| malformed("numbers")(format!("negative atomic number {}", z))))
        .collect::<Result<Vec<u32>>>()?;

    let positions = match row.get_ref(2)? {
        ValueRef::Blob(b) => ase_codec::f64s_from_le(b)
            .and_then(|flat| ase_codec::triples(&flat))
            .map_err(malformed("positions"))?,
        _ => Vec::new(),
    };

    let lattice = match row.get_ref(3)? {
        ValueRef::Blob(b) => ase_codec::f64s_from_le(b)
            .and_then(|flat| ase_codec::lattice_from_flat(&flat))
            .map_err(malformed("cell"))?,
        _ => [[0.0; 3]; 3],
    };

    let energy: Option<f64> = row.get(4)?;

    let key_value_pairs = match row.get_ref(5)? {
        ValueRef::Text(t) | ValueRef::Blob(t) => parse_json(t).map_err(malformed("key_value_pairs"))?,
        _ => Value::Null,
    };
    let key_value_pairs = match key_value_pairs {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => return Err(malformed("key_value_pairs")("not an object".to_string())),
    };

    let data = match row.get_ref(6)? {
        ValueRef::Text(t) => parse_json(t).map_err(malformed("data"))?,
        ValueRef::Blob(b) => ase_codec::bytes_to_value(b)
            .or_else(|_| parse_json(b))
            .map_err(malformed("data"))?,
        _ => Value::Null,
    };

    Ok(SimulationRecord {
        id,
        structure: Structure::from_numbers(lattice, &numbers, &positions)?,
        energy,
        key_value_pairs,
        data,
    })
}

fn parse_json(bytes: &[u8]) -> std::result::Result<Value, String> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    ase_codec::resolve(value, None)
}
