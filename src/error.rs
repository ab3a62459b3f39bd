// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FedError>;

#[derive(Debug, Error)]
pub enum FedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported record store {0:?} (expected .db or .json)")]
    UnsupportedStore(PathBuf),

    #[error("Malformed {field} in record {id}: {reason}")]
    MalformedBlob {
        id: i64,
        field: &'static str,
        reason: String,
    },

    #[error("Record {id} has no '{key}' key")]
    MissingKey { id: i64, key: String },

    #[error("Species '{species}' missing from {table}")]
    MissingSpecies { table: &'static str, species: String },

    #[error("No records with state '{0}'")]
    EmptyGroup(String),

    #[error("Fit of order {order} needs at least {needed} points, got {got}")]
    InsufficientPoints {
        order: usize,
        needed: usize,
        got: usize,
    },

    #[error("Fit input lengths differ: {x} x-values, {y} y-values")]
    LengthMismatch { x: usize, y: usize },

    #[error("Least-squares fit is underdetermined (non-finite input or too few distinct x values)")]
    SingularFit,

    #[error("Record {id} has a degenerate cell (surface area {area} cm^2)")]
    DegenerateCell { id: i64, area: f64 },

    #[error("Record {id} ('{state}') has no slab partner for pairing key {key}")]
    UnpairedRecord { id: i64, state: String, key: String },

    #[error("Pairing key {key} is shared by records {first} and {second} in '{state}'")]
    AmbiguousPairing {
        state: String,
        key: String,
        first: i64,
        second: i64,
    },

    #[error("'{0}' needs a charge-transfer correction but no record carries extrapolation.dFdG")]
    MissingChargeTransfer(String),

    #[error("Mode {index} of '{species}' is not positive ({value})")]
    NonPositiveMode {
        species: String,
        index: usize,
        value: f64,
    },

    #[error("No valence electron count for element '{0}'")]
    MissingValence(String),

    #[error("Unknown element with atomic number {0}")]
    UnknownElement(u32),

    #[error("Rendering failed: {0}")]
    Render(String),
}
