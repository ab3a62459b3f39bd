// src/io/mod.rs
pub mod ase_codec;
pub mod ase_json;
pub mod ase_sqlite;

use std::path::Path;

use crate::error::{FedError, Result};
use crate::model::SimulationRecord;

/// Read-only source of simulation records.
pub trait RecordStore {
    /// Every record in the store, in id order.
    fn records(&self) -> Result<Vec<SimulationRecord>>;

    /// Records whose key/value pair `key` equals `value`.
    fn select(&self, key: &str, value: &str) -> Result<Vec<SimulationRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.matches(key, value))
            .collect())
    }
}

/// Opens an ASE database, picking the reader from the file extension.
pub fn open_store(path: &Path) -> Result<Box<dyn RecordStore>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "db" | "sqlite" | "sqlite3" => Ok(Box::new(ase_sqlite::SqliteStore::new(path))),
        "json" => Ok(Box::new(ase_json::JsonStore::new(path))),
        _ => Err(FedError::UnsupportedStore(path.to_path_buf())),
    }
}
