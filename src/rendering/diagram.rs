// src/rendering/diagram.rs

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;

use crate::analysis::PotentialAnalysis;
use crate::config::DiagramStyle;
use crate::model::jmol_color;

/// Draws the stair-step free-energy diagram, one line per analysed potential,
/// onto the caller's drawing area.
pub fn draw_free_energy_diagram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    analyses: &[PotentialAnalysis],
    style: &DiagramStyle,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let steps = analyses.iter().map(|a| a.landscape.len()).max().unwrap_or(2).max(2);
    let x_max = (steps - 1) as f64;
    let (y_min, y_max) = style.y_range;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_desc("ΔG / eV")
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    let (r, g, b) = jmol_color(&style.catalyst_element);
    let color = RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8);

    for analysis in analyses {
        log::debug!("Diagram line at {:+.2} V", analysis.potential);
        let line = analysis.landscape.iter().enumerate().map(|(i, &e)| (i as f64, e));
        chart.draw_series(LineSeries::new(line, color.stroke_width(style.line_width)))?;
    }

    // Positions below are fractions of the axes
    let at = |fx: f64, fy: f64| (fx * x_max, y_min + fy * (y_max - y_min));
    let font = ("sans-serif", 16).into_font();

    chart.draw_series(std::iter::once(Text::new(
        style.catalyst_label.clone(),
        at(0.4, 0.87),
        font.clone().color(&color),
    )))?;

    if let Some(first) = analyses.first() {
        for (i, label) in first.stage_labels.iter().enumerate() {
            chart.draw_series(std::iter::once(Text::new(
                label.clone(),
                (2.0 * i as f64 + 0.1, y_min + 0.06 * (y_max - y_min)),
                font.clone(),
            )))?;
        }
    }

    if let Some(text) = &style.annotation {
        chart.draw_series(std::iter::once(Text::new(
            text.clone(),
            (0.72, -1.0),
            ("sans-serif", 18).into_font(),
        )))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Context, Format, ImageSurface};
    use plotters_cairo::CairoBackend;
    use std::collections::BTreeMap;

    fn analysis(potential: f64) -> PotentialAnalysis {
        PotentialAnalysis {
            potential,
            ph: 7.0,
            surface_charge: 25.0 * (potential + 0.05),
            u_rhe: potential + 0.413,
            che: BTreeMap::new(),
            intermediates: Vec::new(),
            stage_labels: ["CO₂(g)", "CO₂*", "COOH*", "CO*", "CO(g)"].iter().map(|s| s.to_string()).collect(),
            landscape: vec![0.0, 0.0, 0.4, 0.4, 0.9, 0.9, -0.2, -0.2, 0.5, 0.5],
        }
    }

    #[test]
    fn test_draws_on_caller_area() {
        let surface = ImageSurface::create(Format::ARgb32, 400, 300).unwrap();
        let cr = Context::new(&surface).unwrap();
        {
            let backend = CairoBackend::new(&cr, (400, 300)).unwrap();
            let root = backend.into_drawing_area();
            root.fill(&WHITE).unwrap();
            // caller splits its figure and hands over the left panel
            let (left, _right) = root.split_horizontally(200);
            draw_free_energy_diagram(&left, &[analysis(-0.6), analysis(-0.8)], &DiagramStyle::default()).unwrap();
        }
    }
}
