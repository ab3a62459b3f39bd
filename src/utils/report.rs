// src/utils/report.rs

use crate::analysis::PotentialAnalysis;

/// Text table of the stage energies for every analysed potential.
pub fn landscape_summary(analyses: &[PotentialAnalysis]) -> String {
    let Some(first) = analyses.first() else {
        return "No potentials analysed.\n".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!("{:<10} {:<10} {:<10}", "U/V(SHE)", "U/V(RHE)", "σ/µC cm⁻²"));
    for label in &first.stage_labels {
        out.push_str(&format!(" {:>10}", label));
    }
    out.push('\n');
    out.push_str(&"-".repeat(32 + 11 * first.stage_labels.len()));
    out.push('\n');

    for a in analyses {
        out.push_str(&format!("{:<10.3} {:<10.3} {:<10.2}", a.potential, a.u_rhe, a.surface_charge));
        for e in a.stage_energies() {
            out.push_str(&format!(" {:>10.3}", e));
        }
        out.push('\n');
    }

    out.push('\n');
    for a in analyses {
        out.push_str(&format!("Fits at {:+.3} V (ΔG = slope·σ + intercept):\n", a.potential));
        for i in &a.intermediates {
            let slope = if i.fit.coeffs.len() > 1 { i.fit.coeffs[i.fit.coeffs.len() - 2] } else { 0.0 };
            let intercept = i.fit.coeffs.last().copied().unwrap_or(0.0);
            out.push_str(&format!(
                "  {:<8} slope {:>9.5} eV/(µC cm⁻²)  intercept {:>8.3} eV  ({} points)\n",
                i.species,
                slope,
                intercept,
                i.points.len()
            ));
        }
    }
    out
}
