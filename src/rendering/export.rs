// src/rendering/export.rs

use std::fs;
use std::path::Path;

use cairo::{Context, Format, ImageSurface, PdfSurface};
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters_cairo::CairoBackend;

use super::{draw_calibration_chart, draw_free_energy_diagram};
use crate::analysis::PotentialAnalysis;
use crate::config::{Config, ExportFormat};
use crate::error::{FedError, Result};

type ChartResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn render_err(e: impl std::fmt::Display) -> FedError {
    FedError::Render(e.to_string())
}

/// Renders one chart into a PDF or PNG file. Parent directories are created.
pub fn export_chart<F>(path: &Path, format: ExportFormat, width: u32, height: u32, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<CairoBackend, Shift>) -> ChartResult,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Pdf => {
            let surface = PdfSurface::new(width as f64, height as f64, path).map_err(render_err)?;
            let cr = Context::new(&surface).map_err(render_err)?;
            paint(&cr, width, height, draw)?;
            surface.finish();
        }
        ExportFormat::Png => {
            let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32).map_err(render_err)?;
            let cr = Context::new(&surface).map_err(render_err)?;
            paint(&cr, width, height, draw)?;
            drop(cr);

            let mut file = fs::File::create(path)?;
            surface.write_to_png(&mut file).map_err(render_err)?;
        }
    }
    log::info!("Figure written to {:?}", path);
    Ok(())
}

fn paint<F>(cr: &Context, width: u32, height: u32, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<CairoBackend, Shift>) -> ChartResult,
{
    let backend = CairoBackend::new(cr, (width, height)).map_err(render_err)?;
    let root = backend.into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    draw(&root).map_err(render_err)?;
    root.present().map_err(render_err)?;
    Ok(())
}

/// Writes the free-energy diagram to `diagram_path` and the calibration plot
/// to the configured location.
pub fn export_figures(analyses: &[PotentialAnalysis], cfg: &Config, diagram_path: &Path) -> Result<()> {
    let (w, h) = (cfg.style.width, cfg.style.height);

    export_chart(diagram_path, ExportFormat::from_path(diagram_path), w, h, |root| {
        draw_free_energy_diagram(root, analyses, &cfg.style)
    })?;

    let calibration = cfg.calibration_output.as_path();
    export_chart(calibration, ExportFormat::from_path(calibration), w, h, |root| {
        draw_calibration_chart(root, analyses)
    })
}
