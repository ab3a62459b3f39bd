// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::physics::electrode::ElectrodeModel;
use crate::physics::units::{CM_TO_EV, ROOM_TEMPERATURE};

// --- Enums ---

/// How intermediate records find their slab reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PairingKey {
  /// Same implicit (excess) charge, compared at `Pairing::tolerance`.
  ImplicitCharge,
  /// Same value of the named key/value pair.
  Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExportFormat {
  Png,
  Pdf,
}

impl ExportFormat {
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("png") => ExportFormat::Png,
      _ => ExportFormat::Pdf,
    }
  }
}

// --- Pathway ---

/// Gas-phase end of the pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
  pub label: String,
  /// Reference species; `None` pins the stage at 0 eV.
  pub species: Option<String>,
  /// Proton-electron pairs transferred to reach this stage.
  pub electrons: u32,
}

/// Adsorbed intermediate sampled at several surface charges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intermediate {
  pub species: String,
  pub state: String,
  pub label: String,
  pub electrons: u32,
  /// Shift sampled charges by half the explicit charge transfer (dFdG).
  #[serde(default)]
  pub charge_transfer: bool,
  pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
  pub initial: Endpoint,
  pub intermediates: Vec<Intermediate>,
  pub final_state: Endpoint,
}

impl Default for Pathway {
  fn default() -> Self {
    let intermediate = |species: &str, label: &str, electrons, charge_transfer, color: &str| Intermediate {
      species: species.to_string(),
      state: format!("state_implicit_{}", species),
      label: label.to_string(),
      electrons,
      charge_transfer,
      color: color.to_string(),
    };
    Self {
      initial: Endpoint {
        label: "CO₂(g)".to_string(),
        species: None,
        electrons: 0,
      },
      intermediates: vec![
        intermediate("CO2", "CO₂*", 0, true, "#d62728"),
        intermediate("COOH", "COOH*", 1, false, "#2ca02c"),
        intermediate("CO", "CO*", 2, false, "#1f77b4"),
      ],
      final_state: Endpoint {
        label: "CO(g)".to_string(),
        species: Some("CO(g)".to_string()),
        electrons: 2,
      },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
  pub key: PairingKey,
  /// Implicit charges closer than this (e) share a key.
  pub tolerance: f64,
}

impl Default for Pairing {
  fn default() -> Self {
    Self {
      key: PairingKey::ImplicitCharge,
      tolerance: 1e-3,
    }
  }
}

// --- DiagramStyle ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagramStyle {
  /// Element whose Jmol colour draws the diagram line.
  pub catalyst_element: String,
  pub catalyst_label: String,
  pub y_range: (f64, f64),
  pub line_width: u32,
  pub annotation: Option<String>,
  pub width: u32,
  pub height: u32,
}

impl Default for DiagramStyle {
  fn default() -> Self {
    Self {
      catalyst_element: "Co".to_string(),
      catalyst_label: "CoPc on graphene".to_string(),
      y_range: (-2.2, 2.2),
      line_width: 2,
      annotation: Some("ΔG(CO₂*) < ΔG(COOH*)".to_string()),
      width: 800,
      height: 600,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  pub sampling_key: String,
  pub sampling: String,
  pub state_key: String,
  pub charge_key: String,
  pub slab_state: String,

  pub ph: f64,
  pub potentials: Vec<f64>,
  pub temperature: f64,
  pub cm_to_ev: f64,
  pub electrode: ElectrodeModel,

  /// Vibrational wavenumbers (cm^-1) per adsorbate.
  pub frequencies: BTreeMap<String, Vec<f64>>,
  pub references: BTreeMap<String, f64>,
  pub references_e: BTreeMap<String, f64>,
  /// Per-element valence electron counts replacing the VASP defaults.
  pub valence_overrides: BTreeMap<String, f64>,

  pub pathway: Pathway,
  pub pairing: Pairing,
  pub fit_order: usize,
  pub extrapolation_points: usize,

  pub style: DiagramStyle,
  pub calibration_output: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    let mut frequencies = BTreeMap::new();
    frequencies.insert(
      "CO".to_string(),
      vec![1832.373539, 481.555294, 467.482512, 425.061714, 73.09318, 68.233697],
    );
    frequencies.insert(
      "COOH".to_string(),
      vec![
        3579.438347, 1573.100374, 1241.519251, 932.338544, 624.650858, 619.94479, 468.883838, 246.531351,
        245.478053, 75.740879, 73.602391, 15.378853,
      ],
    );
    frequencies.insert(
      "CO2".to_string(),
      vec![
        1846.027301, 1179.574916, 546.070088, 534.269426, 168.712357, 136.301896, 66.113421, 51.400916,
        36.766228,
      ],
    );

    Self {
      sampling_key: "sampling".to_string(),
      sampling: "sampling_CoPc".to_string(),
      state_key: "states".to_string(),
      charge_key: "tot_charge".to_string(),
      slab_state: "state_implicit_slab".to_string(),
      ph: 7.0,
      potentials: Vec::new(),
      temperature: ROOM_TEMPERATURE,
      cm_to_ev: CM_TO_EV,
      electrode: ElectrodeModel::default(),
      frequencies,
      references: BTreeMap::new(),
      references_e: BTreeMap::new(),
      valence_overrides: BTreeMap::new(),
      pathway: Pathway::default(),
      pairing: Pairing::default(),
      fit_order: 1,
      extrapolation_points: 100,
      style: DiagramStyle::default(),
      calibration_output: PathBuf::from("output_si/SI_charging_curve_CoPc.pdf"),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/fediagram/settings.json)
  pub fn load() -> (Self, String) {
    let path = Self::get_path();
    if path.exists() {
      match Self::from_file(&path) {
        Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
        Err(e) => (Self::default(), format!("Error reading config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(())
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "fediagram", "fediagram") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
