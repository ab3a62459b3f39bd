//src/model/mod.rs
pub mod elements;
pub mod record;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{atomic_number, jmol_color, symbol, valence_electrons};
pub use record::SimulationRecord;
pub use structure::{Atom, Structure};
