// ---------------------------------------------------------------------------
// Plot configuration
// ---------------------------------------------------------------------------

/// Geometry of the central plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotView {
    /// North-up, clockwise polar chart of the rejection trace.
    Polar,
    /// Angle-vs-power pattern cut with toggleable traces.
    Cartesian,
}

/// Rendering configuration for the central plot.
///
/// Owned by the application state and handed to the plot code by reference,
/// so every visual knob lives in one editable record instead of constants
/// scattered through the draw calls.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// User-editable chart title.
    pub title: String,
    pub view: PlotView,
    /// Trace visibility in the cartesian view. The polar view always draws
    /// the rejection trace alone.
    pub show_copol: bool,
    pub show_xpol: bool,
    pub show_rejection: bool,
    pub line_width: f32,
    /// Rows shown in the preview table.
    pub preview_rows: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "Cross-Polarization Rejection".to_string(),
            view: PlotView::Polar,
            show_copol: true,
            show_xpol: true,
            show_rejection: true,
            line_width: 1.5,
            preview_rows: 10,
        }
    }
}
