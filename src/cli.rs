use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// ASE database with the charged-cell calculations (.db or .json)
    #[arg(value_name = "DATABASE", required_unless_present = "write_config")]
    pub database: Option<PathBuf>,

    /// Applied potential in V vs SHE (repeatable, overrides config)
    #[arg(short = 'U', long = "potential", allow_negative_numbers = true)]
    pub potentials: Vec<f64>,

    /// Solution pH (overrides config)
    #[arg(long)]
    pub ph: Option<f64>,

    /// Path to config JSON (default: the user config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Free-energy diagram output (.pdf or .png)
    #[arg(long, short, default_value = "free_energy_diagram.pdf")]
    pub output: PathBuf,

    /// Calibration plot output (overrides config)
    #[arg(long)]
    pub calibration_output: Option<PathBuf>,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}
