// src/physics/thermo.rs

use std::collections::BTreeMap;

use crate::error::{FedError, Result};
use crate::physics::units::KB;

/// Ideal harmonic oscillator set, one entry per normal mode (eV).
///
/// Used for adsorbates whose translational and rotational motion is
/// frustrated on the surface, so every degree of freedom is vibrational.
#[derive(Debug, Clone)]
pub struct HarmonicThermo {
    vib_energies: Vec<f64>,
}

impl HarmonicThermo {
    /// Builds the oscillator set from mode energies in eV.
    /// Every mode must be strictly positive and finite.
    pub fn new(species: &str, vib_energies: Vec<f64>) -> Result<Self> {
        for (index, &value) in vib_energies.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(FedError::NonPositiveMode {
                    species: species.to_string(),
                    index,
                    value,
                });
            }
        }
        Ok(Self { vib_energies })
    }

    /// Builds the oscillator set from wavenumbers (cm^-1).
    pub fn from_wavenumbers(species: &str, wavenumbers: &[f64], cm_to_ev: f64) -> Result<Self> {
        Self::new(species, wavenumbers.iter().map(|w| w * cm_to_ev).collect())
    }

    pub fn zero_point_energy(&self) -> f64 {
        self.vib_energies.iter().map(|e| 0.5 * e).sum()
    }

    /// U(T) = ZPE + sum e / (exp(e/kT) - 1)
    pub fn internal_energy(&self, temperature: f64) -> f64 {
        let kt = KB * temperature;
        let thermal: f64 = self
            .vib_energies
            .iter()
            .map(|e| e / ((e / kt).exp() - 1.0))
            .sum();
        self.zero_point_energy() + thermal
    }

    /// S(T) in eV/K
    pub fn entropy(&self, temperature: f64) -> f64 {
        let kt = KB * temperature;
        let s: f64 = self
            .vib_energies
            .iter()
            .map(|e| {
                let x = e / kt;
                x / (x.exp() - 1.0) - (1.0 - (-x).exp()).ln()
            })
            .sum();
        KB * s
    }

    /// F(T) = U(T) - T S(T)
    pub fn helmholtz_energy(&self, temperature: f64) -> f64 {
        self.internal_energy(temperature) - temperature * self.entropy(temperature)
    }
}

/// Harmonic free-energy correction for every species in the table.
pub fn harmonic_corrections(
    frequencies: &BTreeMap<String, Vec<f64>>,
    cm_to_ev: f64,
    temperature: f64,
) -> Result<BTreeMap<String, f64>> {
    let mut corrections = BTreeMap::new();
    for (species, wavenumbers) in frequencies {
        let thermo = HarmonicThermo::from_wavenumbers(species, wavenumbers, cm_to_ev)?;
        corrections.insert(species.clone(), thermo.helmholtz_energy(temperature));
    }
    Ok(corrections)
}
