use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: trace → Color32
// ---------------------------------------------------------------------------

/// The traces the plots can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    CoPol,
    CrossPol,
    Rejection,
}

/// Fixed trace colours, stable across frames so the legend never reshuffles.
#[derive(Debug, Clone)]
pub struct TraceColors {
    copol: Color32,
    xpol: Color32,
    rejection: Color32,
}

impl Default for TraceColors {
    fn default() -> Self {
        let palette = generate_palette(3);
        TraceColors {
            copol: palette[0],
            xpol: palette[1],
            rejection: palette[2],
        }
    }
}

impl TraceColors {
    pub fn color_for(&self, trace: Trace) -> Color32 {
        match trace {
            Trace::CoPol => self.copol,
            Trace::CrossPol => self.xpol,
            Trace::Rejection => self.rejection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_palette_for_zero() {
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn trace_colors_are_distinct() {
        let colors = TraceColors::default();
        assert_ne!(colors.color_for(Trace::CoPol), colors.color_for(Trace::CrossPol));
        assert_ne!(colors.color_for(Trace::CoPol), colors.color_for(Trace::Rejection));
        assert_ne!(colors.color_for(Trace::CrossPol), colors.color_for(Trace::Rejection));
    }
}
