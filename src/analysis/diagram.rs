// src/analysis/diagram.rs

use std::collections::BTreeMap;

use crate::analysis::collect::CollectedData;
use crate::analysis::pairing::{pair_with_slab, PairedPoint};
use crate::config::{Config, Endpoint, Intermediate};
use crate::error::{FedError, Result};
use crate::physics::electrode::{charge_density, che_correction};
use crate::physics::fit::{fit_points, linspace, Polynomial};
use crate::physics::thermo::harmonic_corrections;

/// Fitted free energy of one intermediate at one potential.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateFit {
    pub species: String,
    pub label: String,
    pub color: String,
    /// Sampled (surface charge density [uC cm^-2], dG [eV])
    pub points: Vec<(f64, f64)>,
    pub fit: Polynomial,
    /// Fit evaluated at the operating surface charge
    pub free_energy: f64,
    /// Fit sampled from the operating charge to the most negative sample
    pub trace: Vec<(f64, f64)>,
}

/// Everything derived for one applied potential.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialAnalysis {
    /// V vs SHE
    pub potential: f64,
    pub ph: f64,
    /// Operating surface charge (uC cm^-2)
    pub surface_charge: f64,
    pub u_rhe: f64,
    /// CHE shift per species
    pub che: BTreeMap<String, f64>,
    pub intermediates: Vec<IntermediateFit>,
    pub stage_labels: Vec<String>,
    /// Stage energies, each repeated twice for a stair-step plot
    pub landscape: Vec<f64>,
}

impl PotentialAnalysis {
    /// One value per stage (the landscape without its duplication).
    pub fn stage_energies(&self) -> Vec<f64> {
        self.landscape.iter().step_by(2).copied().collect()
    }
}

struct Step {
    spec: Intermediate,
    harmonic: f64,
    reference: f64,
    points: Vec<PairedPoint>,
}

/// Potential-independent part of the analysis: paired energies, references
/// and harmonic corrections.
pub struct FreeEnergyModel {
    cfg: Config,
    steps: Vec<Step>,
    charge_transfer: Option<f64>,
    final_reference: f64,
}

fn lookup(table: &BTreeMap<String, f64>, name: &'static str, species: &str) -> Result<f64> {
    table.get(species).copied().ok_or_else(|| FedError::MissingSpecies {
        table: name,
        species: species.to_string(),
    })
}

fn reference_sum(cfg: &Config, species: &str) -> Result<f64> {
    Ok(lookup(&cfg.references, "references", species)? + lookup(&cfg.references_e, "references_e", species)?)
}

impl FreeEnergyModel {
    pub fn build(cfg: &Config, data: &CollectedData) -> Result<Self> {
        let harmonic = harmonic_corrections(&cfg.frequencies, cfg.cm_to_ev, cfg.temperature)?;
        let slab = data.group(&cfg.slab_state);

        let mut steps = Vec::with_capacity(cfg.pathway.intermediates.len());
        for spec in &cfg.pathway.intermediates {
            if spec.charge_transfer && data.charge_transfer.is_none() {
                return Err(FedError::MissingChargeTransfer(spec.species.clone()));
            }
            let harmonic = lookup(&harmonic, "frequencies", &spec.species)?;
            let reference = reference_sum(cfg, &spec.species)?;
            let points = pair_with_slab(&spec.state, data.group(&spec.state), &cfg.slab_state, slab, &cfg.pairing)?;
            log::debug!("{}: {} paired points, F_vib = {:.4} eV", spec.species, points.len(), harmonic);

            steps.push(Step {
                spec: spec.clone(),
                harmonic,
                reference,
                points,
            });
        }

        let final_reference = endpoint_reference(cfg, &cfg.pathway.final_state)?;
        // initial endpoint checked up front as well
        endpoint_reference(cfg, &cfg.pathway.initial)?;

        if let Some(q) = data.charge_transfer {
            log::info!("Explicit charge transfer (sum of dFdG): {:.2}", q);
        }

        Ok(Self {
            cfg: cfg.clone(),
            steps,
            charge_transfer: data.charge_transfer,
            final_reference,
        })
    }

    /// Fits and landscape at `potential` (V vs SHE) and `ph`.
    pub fn analyze(&self, potential: f64, ph: f64) -> Result<PotentialAnalysis> {
        let cfg = &self.cfg;
        let sigma = cfg.electrode.surface_charge(potential);
        let u_rhe = cfg.electrode.rhe_potential(potential, ph);

        let mut che = BTreeMap::new();
        let mut intermediates = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let shift = che_correction(step.spec.electrons, u_rhe);
            che.insert(step.spec.species.clone(), shift);

            // half of the explicit transfer sits on the adsorbate side of the gap
            let offset = if step.spec.charge_transfer {
                self.charge_transfer.unwrap_or(0.0) / 2.0
            } else {
                0.0
            };

            let points: Vec<(f64, f64)> = step
                .points
                .iter()
                .map(|p| {
                    let x = charge_density(p.charge + offset, p.area);
                    let dg = p.delta_e - step.reference + shift + step.harmonic;
                    (x, dg)
                })
                .collect();

            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let fit = fit_points(&xs, &ys, cfg.fit_order, None)?;

            intermediates.push(IntermediateFit {
                species: step.spec.species.clone(),
                label: step.spec.label.clone(),
                color: step.spec.color.clone(),
                free_energy: fit.eval(sigma),
                points,
                fit,
                trace: Vec::new(),
            });
        }

        let lowest = intermediates
            .iter()
            .flat_map(|i| i.points.iter().map(|p| p.0))
            .fold(f64::INFINITY, f64::min);
        let span = linspace(sigma, lowest, cfg.extrapolation_points);
        for i in &mut intermediates {
            i.trace = span.iter().copied().zip(i.fit.eval_many(&span)).collect();
        }

        let initial = &cfg.pathway.initial;
        let last = &cfg.pathway.final_state;
        let initial_energy = match &initial.species {
            Some(_) => -endpoint_reference(cfg, initial)? + che_correction(initial.electrons, u_rhe),
            None => 0.0,
        };
        let final_energy = match &last.species {
            Some(species) => {
                let shift = che_correction(last.electrons, u_rhe);
                che.insert(species.clone(), shift);
                -self.final_reference + shift
            }
            None => 0.0,
        };

        let mut stages = vec![initial_energy];
        stages.extend(intermediates.iter().map(|i| i.free_energy));
        stages.push(final_energy);
        let landscape: Vec<f64> = stages.iter().flat_map(|&e| [e, e]).collect();

        let mut stage_labels = vec![initial.label.clone()];
        stage_labels.extend(intermediates.iter().map(|i| i.label.clone()));
        stage_labels.push(last.label.clone());

        Ok(PotentialAnalysis {
            potential,
            ph,
            surface_charge: sigma,
            u_rhe,
            che,
            intermediates,
            stage_labels,
            landscape,
        })
    }
}

fn endpoint_reference(cfg: &Config, endpoint: &Endpoint) -> Result<f64> {
    match &endpoint.species {
        Some(species) => reference_sum(cfg, species),
        None => Ok(0.0),
    }
}
