use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;

use fediagram::config::Config;
use fediagram::utils::{logger, report};
use fediagram::{analysis, io, rendering};

mod cli;

use cli::Args;

fn main() {
    let args = Args::parse();
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = logger::init(level);

    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if let Some(path) = &args.write_config {
        Config::default()
            .save_to(path)
            .with_context(|| format!("writing {:?}", path))?;
        log::info!("Default config written to {:?}", path);
        return Ok(());
    }

    let mut cfg = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("reading config {:?}", path))?,
        None => {
            let (cfg, msg) = Config::load();
            log::info!("{}", msg);
            cfg
        }
    };
    if !args.potentials.is_empty() {
        cfg.potentials = args.potentials.clone();
    }
    if let Some(ph) = args.ph {
        cfg.ph = ph;
    }
    if let Some(path) = &args.calibration_output {
        cfg.calibration_output = path.clone();
    }
    if cfg.potentials.is_empty() {
        bail!("no potentials given (use -U or set \"potentials\" in the config)");
    }

    let Some(database) = &args.database else {
        bail!("no database given");
    };
    let store = io::open_store(database)?;
    let analyses = analysis::run(store.as_ref(), &cfg, &cfg.potentials, cfg.ph)
        .with_context(|| format!("analysing {:?}", database))?;

    print!("{}", report::landscape_summary(&analyses));
    rendering::export_figures(&analyses, &cfg, &args.output)?;
    Ok(())
}
