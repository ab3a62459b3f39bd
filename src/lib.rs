// src/lib.rs

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod utils;

pub use config::Config;
pub use error::{FedError, Result};
