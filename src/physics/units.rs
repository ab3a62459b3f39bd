// src/physics/units.rs

// CODATA 2014, matching the values ASE's `units` module is built on.
/// Boltzmann constant (J/K)
pub const BOLTZMANN_J: f64 = 1.380_648_52e-23;
/// Elementary charge (C)
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_620_8e-19;
/// Boltzmann constant (eV/K)
pub const KB: f64 = BOLTZMANN_J / ELEMENTARY_CHARGE;

/// Approximate wavenumber -> energy conversion (eV per cm^-1) used for the
/// vibrational tables. The exact value is 1.23984e-4; the tables were
/// calibrated with the rounded one.
pub const CM_TO_EV: f64 = 0.00012;

/// Room temperature (K)
pub const ROOM_TEMPERATURE: f64 = 298.15;

/// Angstrom^2 -> cm^2
pub const ANGSTROM2_TO_CM2: f64 = 1e-16;

/// C -> uC
pub const COULOMB_TO_MICRO: f64 = 1e6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kb_matches_ase() {
        assert!((KB - 8.617_330_337_217_213e-5).abs() < 1e-18);
    }
}
