use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Text};

use crate::color::Trace;
use crate::config::PlotView;
use crate::data::model::{AlignedRow, AlignedTable};
use crate::state::AppState;

const GRID_COLOR: Color32 = Color32::from_gray(110);
const RING_COUNT: usize = 4;
const SPOKE_STEP_DEG: f64 = 30.0;

// ---------------------------------------------------------------------------
// Rejection plot (central panel)
// ---------------------------------------------------------------------------

/// Render the central plot in the view selected by the plot config.
pub fn rejection_plot(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.result else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a co-pol and a cross-pol file to compute rejection  (File → Open…)");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&state.plot.title);
    });

    match state.plot.view {
        PlotView::Polar => polar_plot(ui, state, table),
        PlotView::Cartesian => pattern_plot(ui, state, table),
    }
}

/// North-up, clockwise polar chart of the rejection trace.
///
/// `egui_plot` has no polar axes, so the chart is drawn on a square
/// cartesian plot: radius is measured from the worst finite rejection so the
/// trace fills the rings like an auto-scaled polar axis, and the radial grid
/// is dashed rings plus 30° spokes with their dB and angle labels.
fn polar_plot(ui: &mut Ui, state: &AppState, table: &AlignedTable) {
    let Some((r_min, r_max)) = rejection_bounds(table) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No finite rejection values to plot.");
        });
        return;
    };
    // A flat trace still needs a non-zero radial scale.
    let span = if r_max > r_min { r_max - r_min } else { 1.0 };

    let color = state.colors.color_for(Trace::Rejection);
    let width = state.plot.line_width;

    Plot::new("polar_rejection")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid([false, false])
        .show(ui, |plot_ui| {
            for k in 1..=RING_COUNT {
                let frac = k as f64 / RING_COUNT as f64;
                plot_ui.line(
                    Line::new(circle_points(frac * span))
                        .color(GRID_COLOR)
                        .width(0.5)
                        .style(LineStyle::Dashed { length: 4.0 }),
                );
                let db = r_min + frac * span;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.0, frac * span),
                    RichText::new(format!("{db:.0} dB")).small().color(GRID_COLOR),
                ));
            }

            let mut angle = 0.0;
            while angle < 360.0 {
                let (x, y) = polar_to_xy(angle, span);
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], [x, y]]))
                        .color(GRID_COLOR)
                        .width(0.5)
                        .style(LineStyle::Dashed { length: 4.0 }),
                );
                let (lx, ly) = polar_to_xy(angle, span * 1.08);
                plot_ui.text(Text::new(
                    PlotPoint::new(lx, ly),
                    RichText::new(format!("{angle:.0}°")).small(),
                ));
                angle += SPOKE_STEP_DEG;
            }

            for segment in trace_segments(&table.rows, |r| r.rejection_db) {
                let points: PlotPoints = segment
                    .into_iter()
                    .map(|[angle_deg, rejection]| {
                        let (x, y) = polar_to_xy(angle_deg, rejection - r_min);
                        [x, y]
                    })
                    .collect();
                plot_ui.line(Line::new(points).name("Rejection (dB)").color(color).width(width));
            }
        });
}

/// Angle-vs-power pattern cut with toggleable traces.
fn pattern_plot(ui: &mut Ui, state: &AppState, table: &AlignedTable) {
    let cfg = &state.plot;
    let traces: [(bool, Trace, &str, fn(&AlignedRow) -> f64); 3] = [
        (cfg.show_copol, Trace::CoPol, "Co-pol", |r| r.copol_dbm),
        (cfg.show_xpol, Trace::CrossPol, "Cross-pol (corrected)", |r| r.xpol_dbm),
        (cfg.show_rejection, Trace::Rejection, "Rejection", |r| r.rejection_db),
    ];

    Plot::new("pattern_plot")
        .legend(Legend::default())
        .x_axis_label("Azimuth (deg)")
        .y_axis_label("Power (dBm) / Rejection (dB)")
        .show(ui, |plot_ui| {
            for (show, trace, name, value) in traces {
                if !show {
                    continue;
                }
                let color = state.colors.color_for(trace);
                for segment in trace_segments(&table.rows, value) {
                    plot_ui.line(
                        Line::new(PlotPoints::from(segment))
                            .name(name)
                            .color(color)
                            .width(cfg.line_width),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// North-up clockwise mapping of (angle in degrees, radius) to plot XY.
fn polar_to_xy(angle_deg: f64, radius: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    (radius * theta.sin(), radius * theta.cos())
}

fn circle_points(radius: f64) -> PlotPoints<'static> {
    (0..=64)
        .map(|i| {
            let theta = i as f64 / 64.0 * std::f64::consts::TAU;
            [radius * theta.sin(), radius * theta.cos()]
        })
        .collect()
}

/// Split one column into contiguous runs of finite values. A NaN row breaks
/// the line instead of connecting across the gap.
fn trace_segments(
    rows: &[AlignedRow],
    value: impl Fn(&AlignedRow) -> f64,
) -> Vec<Vec<[f64; 2]>> {
    let mut segments = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for row in rows {
        let v = value(row);
        if v.is_nan() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push([row.angle_deg, v]);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Min and max finite rejection, None when no row has one.
fn rejection_bounds(table: &AlignedTable) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for row in &table.rows {
        let r = row.rejection_db;
        if !r.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (r, r),
            Some((lo, hi)) => (lo.min(r), hi.max(r)),
        });
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(angle: f64, rejection: f64) -> AlignedRow {
        AlignedRow {
            angle_deg: angle,
            copol_dbm: 0.0,
            xpol_dbm: 0.0,
            rejection_db: rejection,
        }
    }

    #[test]
    fn north_up_clockwise_orientation() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;

        let (x, y) = polar_to_xy(0.0, 2.0);
        assert!(close(x, 0.0) && close(y, 2.0));
        let (x, y) = polar_to_xy(90.0, 2.0);
        assert!(close(x, 2.0) && close(y, 0.0));
        let (x, y) = polar_to_xy(180.0, 2.0);
        assert!(close(x, 0.0) && close(y, -2.0));
    }

    #[test]
    fn nan_rows_split_the_trace() {
        let rows = vec![
            row(0.0, 5.0),
            row(10.0, 6.0),
            row(20.0, f64::NAN),
            row(30.0, 4.0),
            row(40.0, 3.0),
        ];
        let segments = trace_segments(&rows, |r| r.rejection_db);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![[0.0, 5.0], [10.0, 6.0]]);
        assert_eq!(segments[1], vec![[30.0, 4.0], [40.0, 3.0]]);
    }

    #[test]
    fn grid_rings_are_closed_circles() {
        let ring = circle_points(2.0);
        let points = ring.points();
        assert_eq!(points.len(), 65);
        let (first, last) = (points[0], points[points.len() - 1]);
        assert!((first.x - last.x).abs() < 1e-9);
        assert!((first.y - last.y).abs() < 1e-9);
        for p in points {
            let radius = (p.x * p.x + p.y * p.y).sqrt();
            assert!((radius - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bounds_skip_non_finite_rows() {
        let table = AlignedTable {
            rows: vec![row(0.0, 5.0), row(10.0, f64::NAN), row(20.0, 8.0)],
        };
        assert_eq!(rejection_bounds(&table), Some((5.0, 8.0)));
        assert_eq!(rejection_bounds(&AlignedTable::default()), None);
    }
}
