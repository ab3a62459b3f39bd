// src/rendering/calibration.rs

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;

use super::hex_color;
use crate::analysis::PotentialAnalysis;

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Pads a range by 5% on each side, or by 1 when it is degenerate.
fn padded((lo, hi): (f64, f64)) -> std::ops::Range<f64> {
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Sampled free energies against surface charge, with the linear fits
/// extrapolated to each operating charge (marked by a vertical line).
pub fn draw_calibration_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    analyses: &[PotentialAnalysis],
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let xy = || {
        analyses.iter().flat_map(|a| {
            a.intermediates
                .iter()
                .flat_map(|i| i.points.iter().chain(i.trace.iter()).copied())
        })
    };
    let x_range = padded(bounds(xy().map(|p| p.0)).unwrap_or((-1.0, 1.0)));
    let y_range = padded(bounds(xy().map(|p| p.1)).unwrap_or((-1.0, 1.0)));
    let (y_lo, y_hi) = (y_range.start, y_range.end);

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Surface Charge / µC cm⁻²")
        .y_desc("ΔE / eV")
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    for (n, analysis) in analyses.iter().enumerate() {
        let sigma = analysis.surface_charge;
        chart.draw_series(LineSeries::new(vec![(sigma, y_lo), (sigma, y_hi)], &BLUE.mix(0.6)))?;

        for inter in &analysis.intermediates {
            let color = hex_color(&inter.color);

            let points = chart.draw_series(
                inter
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )?;
            // one legend entry per species
            if n == 0 {
                points
                    .label(inter.species.clone())
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            }

            chart.draw_series(LineSeries::new(inter.trace.iter().copied(), &color))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
