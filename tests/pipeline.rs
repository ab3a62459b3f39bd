use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde_json::json;
use tempfile::TempDir;

use fediagram::analysis::{self, FreeEnergyModel};
use fediagram::config::Config;
use fediagram::error::FedError;
use fediagram::io::{self, RecordStore};
use fediagram::physics::electrode::charge_density;
use fediagram::physics::thermo::harmonic_corrections;
use fediagram::rendering;

const CHARGES: [f64; 4] = [0.0, 0.5, 1.0, 1.5];
const AREA: f64 = 1e-14;

struct Row {
    numbers: Vec<i32>,
    energy: Option<f64>,
    kvp: serde_json::Value,
    data: Option<Vec<u8>>,
}

fn blob_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// `{"extrapolation": {"dFdG": array}}` in ASE's binary object layout.
fn binary_dfdg(values: &[f64]) -> Vec<u8> {
    let buffer = blob_f64(values);
    let tail = json!({"extrapolation": {"dFdG": {"__ndarray__": [[values.len()], "float64", 8]}}}).to_string();
    let mut out = ((8 + buffer.len()) as i64).to_le_bytes().to_vec();
    out.extend(buffer);
    out.extend(tail.as_bytes());
    out
}

/// Slab: Co + 2 C (17 valence electrons), adsorbates add their own atoms.
fn species_numbers(state: &str) -> Vec<i32> {
    let mut n = vec![27, 6, 6];
    match state {
        "state_implicit_CO2" => n.extend([6, 8, 8]),
        "state_implicit_COOH" => n.extend([6, 8, 8, 1]),
        "state_implicit_CO" => n.extend([6, 8]),
        _ => {}
    }
    n
}

fn neutral(numbers: &[i32]) -> f64 {
    numbers
        .iter()
        .map(|z| match z {
            1 => 1.0,
            6 => 4.0,
            8 => 6.0,
            27 => 9.0,
            _ => unreachable!(),
        })
        .sum()
}

/// dE(q) = offset + slope * q relative to the slab
fn adsorbate_line(state: &str) -> (f64, f64) {
    match state {
        "state_implicit_CO2" => (-23.0, 0.1),
        "state_implicit_COOH" => (-27.0, -0.2),
        "state_implicit_CO" => (-15.0, 0.05),
        _ => (0.0, 0.0),
    }
}

fn rows() -> Vec<Row> {
    let mut rows = Vec::new();
    // adsorbates first and in reverse charge order: pairing must not care
    for state in ["state_implicit_CO", "state_implicit_COOH", "state_implicit_CO2", "state_implicit_slab"] {
        for &q in CHARGES.iter().rev() {
            let numbers = species_numbers(state);
            let (a, b) = adsorbate_line(state);
            let data = (state == "state_implicit_CO2" && q == 1.0).then(|| binary_dfdg(&[-0.2, -0.1]));
            rows.push(Row {
                energy: Some(-100.0 - 2.0 * q + a + b * q),
                kvp: json!({
                    "sampling": "sampling_CoPc",
                    "states": state,
                    "tot_charge": neutral(&numbers) + q,
                }),
                numbers,
                data,
            });
        }
    }
    // failed calculation
    rows.push(Row {
        numbers: species_numbers("state_implicit_CO"),
        energy: None,
        kvp: json!({"sampling": "sampling_CoPc", "states": "state_implicit_CO", "tot_charge": 29.0}),
        data: None,
    });
    // other sample, unpaired on purpose
    rows.push(Row {
        numbers: species_numbers("state_implicit_CO"),
        energy: Some(-1.0),
        kvp: json!({"sampling": "sampling_other", "states": "state_implicit_CO", "tot_charge": 40.0}),
        data: None,
    });
    rows
}

fn write_sqlite(path: &Path, rows: &[Row]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE systems (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numbers BLOB, positions BLOB, cell BLOB,
            energy REAL, key_value_pairs TEXT, data BLOB)",
    )
    .unwrap();
    let cell = blob_f64(&[10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 20.0]);
    for row in rows {
        let positions = blob_f64(&vec![0.0; 3 * row.numbers.len()]);
        conn.execute(
            "INSERT INTO systems (numbers, positions, cell, energy, key_value_pairs, data) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![blob_i32(&row.numbers), positions, cell, row.energy, row.kvp.to_string(), row.data],
        )
        .unwrap();
    }
}

fn config() -> Config {
    let mut cfg = Config::default();
    for (species, r, re) in [("CO2", -0.2, -22.9), ("COOH", 0.1, -26.5), ("CO", -0.1, -14.8), ("CO(g)", -0.3, -14.8)] {
        cfg.references.insert(species.to_string(), r);
        cfg.references_e.insert(species.to_string(), re);
    }
    cfg
}

fn database() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");
    write_sqlite(&path, &rows());
    (dir, path)
}

#[test]
fn sqlite_store_reads_and_filters() {
    let (_dir, path) = database();
    let store = io::open_store(&path).unwrap();

    assert_eq!(store.records().unwrap().len(), 18);
    let sample = store.select("sampling", "sampling_CoPc").unwrap();
    assert_eq!(sample.len(), 17);
    assert!(sample.iter().any(|r| r.energy.is_none()));

    let with_dfdg: Vec<_> = sample.iter().filter_map(|r| r.charge_transfer()).collect();
    assert_eq!(with_dfdg.len(), 1);
    assert!((with_dfdg[0] + 0.3).abs() < 1e-12);
    assert_eq!(sample[0].structure.atoms[0].element, "Co");
    assert!((sample[0].structure.area_cm2() - AREA).abs() < 1e-26);
}

#[test]
fn full_analysis_matches_hand_calculation() {
    let (_dir, path) = database();
    let store = io::open_store(&path).unwrap();
    let cfg = config();

    let analyses = analysis::run(store.as_ref(), &cfg, &[0.0, -0.6], 7.0).unwrap();
    assert_eq!(analyses.len(), 2);

    let h = harmonic_corrections(&cfg.frequencies, cfg.cm_to_ev, cfg.temperature).unwrap();
    let per_e = charge_density(1.0, AREA);

    for a in &analyses {
        assert_eq!(a.landscape.len(), 10);
        assert_eq!(a.landscape[0], 0.0);
        assert_eq!(a.landscape[0], a.landscape[1]);
        assert_eq!(a.landscape[8], a.landscape[9]);

        let q = a.surface_charge / per_e;
        let co = -15.0 + 0.05 * q + 14.9 + 2.0 * a.u_rhe + h["CO"];
        let cooh = -27.0 - 0.2 * q + 26.4 + a.u_rhe + h["COOH"];
        assert!((a.landscape[6] - co).abs() < 1e-8);
        assert!((a.landscape[4] - cooh).abs() < 1e-8);

        // CO2 samples sit at q + dFdG/2
        let q_co2 = q - (-0.3 / 2.0);
        let co2 = -23.0 + 0.1 * q_co2 + 23.1 + h["CO2"];
        assert!((a.landscape[2] - co2).abs() < 1e-8);

        assert_eq!(a.intermediates.iter().map(|i| i.points.len()).sum::<usize>(), 12);
    }

    // U = 0, pH 7
    assert!((analyses[0].u_rhe - 0.413).abs() < 1e-12);
    assert!((analyses[0].che["CO"] - 0.826).abs() < 1e-12);
    assert!((analyses[0].che["COOH"] - 0.413).abs() < 1e-12);
    assert!((analyses[0].landscape[8] - (15.1 + 0.826)).abs() < 1e-9);

    let again = analysis::run(store.as_ref(), &cfg, &[0.0, -0.6], 7.0).unwrap();
    assert_eq!(analyses, again);
}

#[test]
fn record_without_energy_does_not_disturb_others() {
    let dir = tempfile::tempdir().unwrap();
    let complete: Vec<Row> = rows().into_iter().filter(|r| r.energy.is_some()).collect();
    let a = dir.path().join("a.db");
    let b = dir.path().join("b.db");
    write_sqlite(&a, &complete);
    write_sqlite(&b, &rows());

    let cfg = config();
    let run = |p: &Path| analysis::run(io::open_store(p).unwrap().as_ref(), &cfg, &[-0.4], 7.0).unwrap();
    assert_eq!(run(&a), run(&b));
}

#[test]
fn unpaired_adsorbate_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unpaired.db");
    let mut rs = rows();
    rs.push(Row {
        numbers: species_numbers("state_implicit_CO"),
        energy: Some(-120.0),
        kvp: json!({"sampling": "sampling_CoPc", "states": "state_implicit_CO", "tot_charge": 27.0 + 3.0}),
        data: None,
    });
    write_sqlite(&path, &rs);

    let store = io::open_store(&path).unwrap();
    let err = analysis::run(store.as_ref(), &config(), &[0.0], 7.0).unwrap_err();
    assert!(matches!(err, FedError::UnpairedRecord { ref state, .. } if state == "state_implicit_CO"));
}

#[test]
fn json_store_gives_same_result() {
    let (_dir, db_path) = database();
    let sqlite_records = io::open_store(&db_path).unwrap().records().unwrap();

    // same rows in ASE JSON layout, dFdG inline
    let mut root = serde_json::Map::new();
    let mut ids = Vec::new();
    for r in &sqlite_records {
        let numbers: Vec<u32> = r
            .structure
            .atoms
            .iter()
            .map(|a| fediagram::model::atomic_number(&a.element))
            .collect();
        let mut row = json!({
            "numbers": numbers,
            "cell": {"__ndarray__": [[3, 3], "float64", r.structure.lattice.concat()]},
            "key_value_pairs": r.key_value_pairs,
            "data": r.data,
        });
        if let Some(e) = r.energy {
            row["energy"] = json!(e);
        }
        root.insert(r.id.to_string(), row);
        ids.push(r.id);
    }
    root.insert("ids".to_string(), json!(ids));

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("results.json");
    std::fs::write(&json_path, serde_json::Value::Object(root).to_string()).unwrap();

    let cfg = config();
    let from_json = analysis::run(io::open_store(&json_path).unwrap().as_ref(), &cfg, &[-0.5], 7.0).unwrap();
    let from_sqlite = analysis::run(io::open_store(&db_path).unwrap().as_ref(), &cfg, &[-0.5], 7.0).unwrap();
    assert_eq!(from_json, from_sqlite);
}

#[test]
fn model_requires_every_reference() {
    let (_dir, path) = database();
    let records = io::open_store(&path).unwrap().select("sampling", "sampling_CoPc").unwrap();
    let mut cfg = config();
    cfg.references = BTreeMap::new();

    let data = analysis::collect(&records, &cfg).unwrap();
    let err = FreeEnergyModel::build(&cfg, &data).err().unwrap();
    assert!(matches!(err, FedError::MissingSpecies { table: "references", .. }));
}

#[test]
fn figures_are_written() {
    let (dir, path) = database();
    let mut cfg = config();
    cfg.calibration_output = dir.path().join("output_si").join("SI_charging_curve_CoPc.pdf");

    let analyses = analysis::run(io::open_store(&path).unwrap().as_ref(), &cfg, &[-0.6, -0.8], 7.0).unwrap();
    let diagram = dir.path().join("diagram.png");
    rendering::export_figures(&analyses, &cfg, &diagram).unwrap();

    let png = std::fs::read(&diagram).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
    let pdf = std::fs::read(&cfg.calibration_output).unwrap();
    assert_eq!(&pdf[..4], b"%PDF");
}
