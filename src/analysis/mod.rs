// src/analysis/mod.rs
pub mod collect;
pub mod diagram;
pub mod pairing;

pub use collect::{collect, CollectedData, Sample};
pub use diagram::{FreeEnergyModel, IntermediateFit, PotentialAnalysis};
pub use pairing::{pair_with_slab, PairedPoint};

use crate::config::Config;
use crate::error::Result;
use crate::io::RecordStore;

/// Reads the configured sample from `store` and analyses every potential.
pub fn run(store: &dyn RecordStore, cfg: &Config, potentials: &[f64], ph: f64) -> Result<Vec<PotentialAnalysis>> {
    let records = store.select(&cfg.sampling_key, &cfg.sampling)?;
    log::info!("{} records tagged {}={}", records.len(), cfg.sampling_key, cfg.sampling);

    let data = collect(&records, cfg)?;
    if !data.skipped.is_empty() {
        log::debug!("{} records without energy skipped", data.skipped.len());
    }

    let model = FreeEnergyModel::build(cfg, &data)?;
    potentials
        .iter()
        .map(|&u| {
            let analysis = model.analyze(u, ph)?;
            log::info!(
                "U = {:+.3} V (RHE {:+.3} V), sigma = {:.2} uC/cm2",
                u,
                analysis.u_rhe,
                analysis.surface_charge
            );
            Ok(analysis)
        })
        .collect()
}
