// src/physics/electrode.rs

use serde::{Deserialize, Serialize};

use crate::physics::units::{ANGSTROM2_TO_CM2, COULOMB_TO_MICRO, ELEMENTARY_CHARGE};

/// Electrode/double-layer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeModel {
    /// Gap capacitance (uF cm^-2)
    pub capacitance: f64,
    /// Potential of zero charge (V vs SHE)
    pub pzc: f64,
    /// Nernstian shift of the RHE scale (V per pH unit)
    pub nernst_slope: f64,
}

impl Default for ElectrodeModel {
    fn default() -> Self {
        Self {
            capacitance: 25.0,
            pzc: -0.05,
            nernst_slope: 0.059,
        }
    }
}

impl ElectrodeModel {
    /// Surface charge density (uC cm^-2) at `potential` (V vs SHE).
    pub fn surface_charge(&self, potential: f64) -> f64 {
        self.capacitance * (potential - self.pzc)
    }

    /// SHE -> RHE
    pub fn rhe_potential(&self, potential: f64, ph: f64) -> f64 {
        potential + self.nernst_slope * ph
    }
}

/// Computational hydrogen electrode shift for `electrons` proton-electron
/// pairs transferred at `u_rhe`.
pub fn che_correction(electrons: u32, u_rhe: f64) -> f64 {
    electrons as f64 * u_rhe
}

/// Converts an excess electron count in a cell of `area_cm2` into a surface
/// charge density (uC cm^-2). Excess electrons give a negative density.
pub fn charge_density(excess_electrons: f64, area_cm2: f64) -> f64 {
    -excess_electrons / area_cm2 * ELEMENTARY_CHARGE * COULOMB_TO_MICRO
}

/// Cell area (cm^2) from the in-plane lattice vectors, |a| * |b|.
pub fn cell_area_cm2(lattice: &[[f64; 3]; 3]) -> f64 {
    let a = nalgebra::Vector3::from(lattice[0]);
    let b = nalgebra::Vector3::from(lattice[1]);
    a.norm() * b.norm() * ANGSTROM2_TO_CM2
}
