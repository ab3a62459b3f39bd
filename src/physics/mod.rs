// src/physics/mod.rs
pub mod electrode;
pub mod fit;
pub mod thermo;
pub mod units;
