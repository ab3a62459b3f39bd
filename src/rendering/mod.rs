pub mod calibration;
pub mod diagram;
pub mod export;

use plotters::style::RGBColor;

// Re-export specific functions to keep the API clean for the rest of the app
pub use calibration::draw_calibration_chart;
pub use diagram::draw_free_energy_diagram;
pub use export::{export_chart, export_figures};

/// Parses "#rrggbb", falling back to black.
pub fn hex_color(hex: &str) -> RGBColor {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => RGBColor(0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#d62728"), RGBColor(0xd6, 0x27, 0x28));
        assert_eq!(hex_color("1f77b4"), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(hex_color("tab:red"), RGBColor(0, 0, 0));
    }
}
