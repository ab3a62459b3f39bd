// src/analysis/pairing.rs

use crate::analysis::collect::Sample;
use crate::config::{Pairing, PairingKey};
use crate::error::{FedError, Result};

/// Intermediate sample matched with its slab reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedPoint {
    pub intermediate_id: i64,
    pub slab_id: i64,
    /// Implicit charge of the intermediate record (e)
    pub charge: f64,
    /// Cell area of the intermediate record (cm^2)
    pub area: f64,
    /// E(intermediate) - E(slab)
    pub delta_e: f64,
}

fn same_key(a: &Sample, b: &Sample, pairing: &Pairing) -> bool {
    match pairing.key {
        PairingKey::ImplicitCharge => (a.charge - b.charge).abs() <= pairing.tolerance,
        PairingKey::Field(_) => a.tag.is_some() && a.tag == b.tag,
    }
}

fn key_label(s: &Sample, pairing: &Pairing) -> String {
    match &pairing.key {
        PairingKey::ImplicitCharge => format!("q={:.4}", s.charge),
        PairingKey::Field(name) => format!("{}={}", name, s.tag.as_deref().unwrap_or("?")),
    }
}

/// Pairs every intermediate sample with exactly one slab sample.
///
/// Result is ordered by charge, ties broken by record id.
pub fn pair_with_slab(
    state: &str,
    intermediates: &[Sample],
    slab_state: &str,
    slab: &[Sample],
    pairing: &Pairing,
) -> Result<Vec<PairedPoint>> {
    if intermediates.is_empty() {
        return Err(FedError::EmptyGroup(state.to_string()));
    }
    if slab.is_empty() {
        return Err(FedError::EmptyGroup(slab_state.to_string()));
    }

    let mut used = vec![false; slab.len()];
    let mut points = Vec::with_capacity(intermediates.len());

    for sample in intermediates {
        let mut matches = slab
            .iter()
            .enumerate()
            .filter(|(_, s)| same_key(sample, s, pairing));

        let Some((idx, partner)) = matches.next() else {
            return Err(FedError::UnpairedRecord {
                id: sample.id,
                state: state.to_string(),
                key: key_label(sample, pairing),
            });
        };
        if let Some((_, other)) = matches.next() {
            return Err(FedError::AmbiguousPairing {
                state: slab_state.to_string(),
                key: key_label(sample, pairing),
                first: partner.id,
                second: other.id,
            });
        }

        used[idx] = true;
        points.push(PairedPoint {
            intermediate_id: sample.id,
            slab_id: partner.id,
            charge: sample.charge,
            area: sample.area,
            delta_e: sample.energy - partner.energy,
        });
    }

    let unused = used.iter().filter(|u| !**u).count();
    if unused > 0 {
        log::warn!("{} of {} '{}' records have no '{}' partner", unused, slab.len(), slab_state, state);
    }

    points.sort_by(|a, b| a.charge.total_cmp(&b.charge).then(a.intermediate_id.cmp(&b.intermediate_id)));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64, charge: f64, energy: f64) -> Sample {
        Sample { id, charge, energy, area: 1e-14, tag: None }
    }

    #[test]
    fn test_pairs_by_charge_not_order() {
        // slab rows stored in a different order than the adsorbate rows
        let co = [sample(1, 1.0, -20.0), sample(2, 0.0, -18.0), sample(3, 0.5, -19.0)];
        let slab = [sample(10, 0.5, -9.0), sample(11, 1.0, -10.0), sample(12, 0.0, -8.0)];
        let points = pair_with_slab("co", &co, "slab", &slab, &Pairing::default()).unwrap();

        let charges: Vec<f64> = points.iter().map(|p| p.charge).collect();
        assert_eq!(charges, vec![0.0, 0.5, 1.0]);
        assert_eq!(points[0].slab_id, 12);
        assert_eq!(points[2].slab_id, 11);
        assert!(points.iter().all(|p| (p.delta_e + 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_tolerance() {
        let co = [sample(1, 0.5004, -20.0)];
        let slab = [sample(10, 0.5, -9.0)];
        assert!(pair_with_slab("co", &co, "slab", &slab, &Pairing::default()).is_ok());

        let strict = Pairing { tolerance: 1e-5, ..Pairing::default() };
        let err = pair_with_slab("co", &co, "slab", &slab, &strict).unwrap_err();
        assert!(matches!(err, FedError::UnpairedRecord { id: 1, .. }));
    }

    #[test]
    fn test_ambiguous_slab() {
        let co = [sample(1, 0.5, -20.0)];
        let slab = [sample(10, 0.5, -9.0), sample(11, 0.5, -9.1)];
        let err = pair_with_slab("co", &co, "slab", &slab, &Pairing::default()).unwrap_err();
        assert!(matches!(err, FedError::AmbiguousPairing { first: 10, second: 11, .. }));
    }

    #[test]
    fn test_empty_groups() {
        let slab = [sample(10, 0.5, -9.0)];
        assert!(matches!(
            pair_with_slab("co", &[], "slab", &slab, &Pairing::default()),
            Err(FedError::EmptyGroup(ref s)) if s == "co"
        ));
        assert!(matches!(
            pair_with_slab("co", &slab, "slab", &[], &Pairing::default()),
            Err(FedError::EmptyGroup(ref s)) if s == "slab"
        ));
    }

    #[test]
    fn test_field_key() {
        let pairing = Pairing { key: PairingKey::Field("run".to_string()), tolerance: 0.0 };
        let mut a = sample(1, 0.5, -20.0);
        a.tag = Some("r1".to_string());
        let mut b = sample(10, 0.7, -9.0);
        b.tag = Some("r1".to_string());
        let mut c = sample(11, 0.5, -9.0);
        c.tag = Some("r2".to_string());

        let points = pair_with_slab("co", &[a], "slab", &[c, b], &pairing).unwrap();
        assert_eq!(points[0].slab_id, 10);
    }
}
