use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::PlotView;
use crate::data::model::{AlignedTable, ColumnSummary, Polarization};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Measurement files ----
            ui.strong("Measurements");
            measurement_controls(ui, state, Polarization::CoPol);
            ui.add_space(4.0);
            measurement_controls(ui, state, Polarization::CrossPol);
            ui.separator();

            // ---- Cross-pol correction ----
            ui.strong("Correction");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Cross-pol offset");
                if ui
                    .add(
                        egui::DragValue::new(&mut state.correction_db)
                            .speed(0.1)
                            .suffix(" dB"),
                    )
                    .changed()
                {
                    state.recompute();
                }
            });
            ui.separator();

            // ---- Plot configuration ----
            ui.strong("Plot");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut state.plot.title);
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut state.plot.view, PlotView::Polar, "Polar");
                ui.radio_value(&mut state.plot.view, PlotView::Cartesian, "Pattern");
            });
            if state.plot.view == PlotView::Cartesian {
                ui.checkbox(&mut state.plot.show_copol, "Co-pol");
                ui.checkbox(&mut state.plot.show_xpol, "Cross-pol (corrected)");
                ui.checkbox(&mut state.plot.show_rejection, "Rejection");
            }
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Line width");
                ui.add(egui::Slider::new(&mut state.plot.line_width, 0.5..=5.0));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Preview rows");
                let limit = preview_row_limit(state.result.as_ref());
                ui.add(egui::DragValue::new(&mut state.plot.preview_rows).range(1..=limit));
            });
            ui.separator();

            // ---- Result readouts ----
            if let Some(table) = &state.result {
                ui.strong("Result");
                if let Some((angle, rejection)) = table.worst_rejection() {
                    ui.label(format!("Worst rejection: {rejection:.2} dB at {angle:.1}°"));
                }
                egui::CollapsingHeader::new(RichText::new("Summary statistics").strong())
                    .id_salt("summary_stats")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        summary_grid(ui, table);
                    });
            }
        });
}

/// One measurement slot: loaded-file info plus its open button.
fn measurement_controls(ui: &mut Ui, state: &mut AppState, polarization: Polarization) {
    let loaded = match polarization {
        Polarization::CoPol => state.copol.as_ref(),
        Polarization::CrossPol => state.xpol.as_ref(),
    };

    match loaded {
        Some(file) => {
            ui.label(format!("{polarization}: {}", file.name));
            let series = &file.series;
            let mut info = format!("{} samples", series.len());
            if series.incomplete_count() > 0 {
                info.push_str(&format!(", {} incomplete", series.incomplete_count()));
            }
            if let Some((lo, hi)) = series.angle_span() {
                info.push_str(&format!(", {lo:.1}° to {hi:.1}°"));
            }
            ui.small(info);
        }
        None => {
            ui.label(format!("{polarization}: not loaded"));
        }
    }

    if ui.button(format!("Open {polarization} file…")).clicked() {
        open_measurement_dialog(state, polarization);
    }
}

/// Descriptive statistics for the four table columns.
fn summary_grid(ui: &mut Ui, table: &AlignedTable) {
    let summary = table.summary();
    let columns = [
        ("Azimuth", &summary.angle),
        ("Co-pol", &summary.copol),
        ("Cross-pol", &summary.xpol),
        ("Rejection", &summary.rejection),
    ];
    let stats: [(&str, fn(&ColumnSummary) -> f64); 7] = [
        ("mean", |c| c.mean),
        ("std", |c| c.std),
        ("min", |c| c.min),
        ("25%", |c| c.q25),
        ("50%", |c| c.median),
        ("75%", |c| c.q75),
        ("max", |c| c.max),
    ];

    egui::Grid::new("summary_grid").striped(true).show(ui, |ui: &mut Ui| {
        ui.label("");
        for (name, _) in &columns {
            ui.strong(*name);
        }
        ui.end_row();

        ui.label("count");
        for (_, col) in &columns {
            ui.label(col.count.to_string());
        }
        ui.end_row();

        for (label, stat) in stats {
            ui.label(label);
            for (_, col) in &columns {
                ui.label(fmt_cell(stat(col)));
            }
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – preview table
// ---------------------------------------------------------------------------

/// Render the aligned-table preview in the bottom panel.
pub fn preview_panel(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.result else {
        return;
    };

    let shown = table.len().min(state.plot.preview_rows);
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Preview");
        ui.label(format!("first {shown} of {} rows", table.len()));
    });

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .columns(Column::remainder(), 3)
        .header(18.0, |mut header| {
            for title in ["Azimuth", "Co-pol (dBm)", "Cross-pol (dBm)", "Rejection (dB)"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let r = &table.rows[row.index()];
                row.col(|ui| {
                    ui.label(format!("{:.1}", r.angle_deg));
                });
                row.col(|ui| {
                    ui.label(fmt_cell(r.copol_dbm));
                });
                row.col(|ui| {
                    ui.label(fmt_cell(r.xpol_dbm));
                });
                row.col(|ui| {
                    ui.label(fmt_cell(r.rejection_db));
                });
            });
        });
}

/// Upper bound for the preview-rows control. Once a result exists the bound
/// is the table length, so fine sweeps of any size can be browsed in full.
fn preview_row_limit(result: Option<&AlignedTable>) -> usize {
    result.map_or(500, AlignedTable::len).max(1)
}

/// Missing values render as a dash, everything else to two decimals.
fn fmt_cell(value: f64) -> String {
    if value.is_nan() {
        "–".to_string()
    } else {
        format!("{value:.2}")
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open co-pol…").clicked() {
                open_measurement_dialog(state, Polarization::CoPol);
                ui.close_menu();
            }
            if ui.button("Open cross-pol…").clicked() {
                open_measurement_dialog(state, Polarization::CrossPol);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.result.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.result {
            ui.label(format!("{} aligned rows", table.len()));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_measurement_dialog(state: &mut AppState, polarization: Polarization) {
    let title = format!("Open {polarization} measurement");
    let file = rfd::FileDialog::new()
        .set_title(&title)
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_side(polarization, &path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export rejection table")
        .add_filter("CSV", &["csv"])
        .set_file_name("rejeicao_xpol.csv")
        .save_file();

    if let Some(path) = file {
        state.export_csv(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AlignedRow;

    fn table_of(rows: usize) -> AlignedTable {
        let rows = (0..rows)
            .map(|i| AlignedRow {
                angle_deg: i as f64 * 0.5,
                copol_dbm: -3.0,
                xpol_dbm: -35.0,
                rejection_db: 32.0,
            })
            .collect();
        AlignedTable { rows }
    }

    #[test]
    fn preview_limit_reaches_every_aligned_row() {
        let fine_sweep = table_of(720);
        assert_eq!(preview_row_limit(Some(&fine_sweep)), 720);
    }

    #[test]
    fn preview_limit_stays_positive() {
        assert_eq!(preview_row_limit(Some(&AlignedTable::default())), 1);
        assert!(preview_row_limit(None) >= 1);
    }
}
