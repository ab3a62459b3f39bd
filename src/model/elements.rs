// src/model/elements.rs

use crate::error::{FedError, Result};

/// Element symbols indexed by atomic number - 1.
const SYMBOLS: [&str; 86] = [
    // --- Period 1 ---
    "H", "He",
    // --- Period 2 ---
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    // --- Period 3 ---
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    // --- Period 4 ---
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr",
    // --- Period 5 ---
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe",
    // --- Period 6 ---
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
];

/// Symbol for atomic number `z`
pub fn symbol(z: u32) -> Result<&'static str> {
    if z == 0 {
        return Err(FedError::UnknownElement(z));
    }
    SYMBOLS
        .get(z as usize - 1)
        .copied()
        .ok_or(FedError::UnknownElement(z))
}

/// Returns the atomic number (Z) for a given element symbol, 0 if unknown.
pub fn atomic_number(element: &str) -> u32 {
    SYMBOLS
        .iter()
        .position(|&s| s == element)
        .map_or(0, |i| i as u32 + 1)
}

/// Valence electron count (ZVAL) of a VASP PBE PAW potential.
///
/// The plain potential is used, except for these semicore variants:
/// `_sv` for Li, K, Ca, Sc, Rb, Sr, Y, Zr, Cs, Ba; `_pv` for Na, Nb;
/// `_d` for Ga, Ge, In, Sn, Tl, Pb, Bi. Other choices (e.g. Ti_sv) go
/// through `Config::valence_overrides`.
pub fn valence_electrons(element: &str) -> Option<f64> {
    let zval = match element {
        "H" => 1.0, "He" => 2.0,
        "Li" => 3.0, "Be" => 2.0, "B" => 3.0, "C" => 4.0, "N" => 5.0, "O" => 6.0, "F" => 7.0, "Ne" => 8.0,
        "Na" => 7.0, "Mg" => 2.0, "Al" => 3.0, "Si" => 4.0, "P" => 5.0, "S" => 6.0, "Cl" => 7.0, "Ar" => 8.0,
        "K" => 9.0, "Ca" => 10.0, "Sc" => 11.0, "Ti" => 4.0, "V" => 5.0, "Cr" => 6.0, "Mn" => 7.0,
        "Fe" => 8.0, "Co" => 9.0, "Ni" => 10.0, "Cu" => 11.0, "Zn" => 12.0, "Ga" => 13.0, "Ge" => 14.0,
        "As" => 5.0, "Se" => 6.0, "Br" => 7.0, "Kr" => 8.0,
        "Rb" => 9.0, "Sr" => 10.0, "Y" => 11.0, "Zr" => 12.0, "Nb" => 11.0, "Mo" => 6.0, "Tc" => 7.0,
        "Ru" => 8.0, "Rh" => 9.0, "Pd" => 10.0, "Ag" => 11.0, "Cd" => 12.0, "In" => 13.0, "Sn" => 14.0,
        "Sb" => 5.0, "Te" => 6.0, "I" => 7.0, "Xe" => 8.0,
        "Cs" => 9.0, "Ba" => 10.0, "La" => 11.0, "Hf" => 4.0, "Ta" => 5.0, "W" => 6.0, "Re" => 7.0,
        "Os" => 8.0, "Ir" => 9.0, "Pt" => 10.0, "Au" => 11.0, "Hg" => 12.0, "Tl" => 13.0, "Pb" => 14.0,
        "Bi" => 15.0,
        _ => return None,
    };
    Some(zval)
}

/// Jmol colour (r, g, b) in [0, 1], hot pink for anything unlisted.
pub fn jmol_color(element: &str) -> (f64, f64, f64) {
    match element {
        "H" => (1.000, 1.000, 1.000),
        "C" => (0.565, 0.565, 0.565),
        "N" => (0.188, 0.314, 0.973),
        "O" => (1.000, 0.051, 0.051),
        "Mn" => (0.612, 0.478, 0.780),
        "Fe" => (0.878, 0.400, 0.200),
        "Co" => (0.941, 0.565, 0.627),
        "Ni" => (0.314, 0.816, 0.314),
        "Cu" => (0.784, 0.502, 0.200),
        "Zn" => (0.490, 0.502, 0.690),
        "Ag" => (0.753, 0.753, 0.753),
        "Au" => (1.000, 0.820, 0.137),
        "Pt" => (0.816, 0.816, 0.878),
        "Pd" => (0.000, 0.412, 0.522),
        _ => (1.00, 0.08, 0.58),
    }
}
