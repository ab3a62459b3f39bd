// src/model/structure.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FedError, Result};
use crate::model::elements;
use crate::physics::electrode::cell_area_cm2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub position: [f64; 3],
}

/// One atomic configuration as stored alongside a simulation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
}

impl Structure {
    /// Builds a structure from ASE-style atomic numbers and Cartesian
    /// positions. Missing positions default to the origin.
    pub fn from_numbers(lattice: [[f64; 3]; 3], numbers: &[u32], positions: &[[f64; 3]]) -> Result<Self> {
        let atoms = numbers
            .iter()
            .enumerate()
            .map(|(i, &z)| {
                Ok(Atom {
                    element: elements::symbol(z)?.to_string(),
                    position: positions.get(i).copied().unwrap_or([0.0; 3]),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lattice, atoms })
    }

    /// In-plane cell area (cm^2)
    pub fn area_cm2(&self) -> f64 {
        cell_area_cm2(&self.lattice)
    }

    /// Electron count of the neutral configuration with the VASP valences,
    /// `overrides` taking precedence over the built-in table.
    pub fn neutral_electrons(&self, overrides: &BTreeMap<String, f64>) -> Result<f64> {
        self.atoms.iter().try_fold(0.0, |acc, atom| {
            let zval = overrides
                .get(&atom.element)
                .copied()
                .or_else(|| elements::valence_electrons(&atom.element))
                .ok_or_else(|| FedError::MissingValence(atom.element.clone()))?;
            Ok(acc + zval)
        })
    }
}
