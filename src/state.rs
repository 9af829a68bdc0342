use std::path::Path;

use anyhow::{Context, Result};

use crate::color::TraceColors;
use crate::config::PlotConfig;
use crate::data::align::align;
use crate::data::export::write_csv;
use crate::data::loader::{parse_series, IngestOptions};
use crate::data::model::{AlignedTable, Polarization, Series};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One successfully ingested measurement file.
pub struct LoadedFile {
    /// File name shown in the UI (not the full path).
    pub name: String,
    pub series: Series,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Co-pol measurement (None until the user loads a file).
    pub copol: Option<LoadedFile>,

    /// Cross-pol measurement.
    pub xpol: Option<LoadedFile>,

    /// Calibration offset added to every cross-pol power, in dB.
    pub correction_db: f64,

    /// Column-resolution configuration applied to every ingested file.
    pub ingest: IngestOptions,

    /// Plot configuration edited from the side panel.
    pub plot: PlotConfig,

    /// Trace colours shared by both plot views.
    pub colors: TraceColors,

    /// Aligned rejection table, recomputed whenever an input or the
    /// correction changes. None until both sides are loaded.
    pub result: Option<AlignedTable>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            copol: None,
            xpol: None,
            correction_db: 0.0,
            ingest: IngestOptions::default(),
            plot: PlotConfig::default(),
            colors: TraceColors::default(),
            result: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Read and parse one measurement file, then re-derive the table.
    /// Failures land in `status_message`; the previously loaded file for
    /// that side is kept.
    pub fn load_side(&mut self, polarization: Polarization, path: &Path) {
        match ingest_file(path, polarization, &self.ingest) {
            Ok(loaded) => {
                log::info!(
                    "{polarization}: loaded '{}' ({} samples, {} incomplete)",
                    loaded.name,
                    loaded.series.len(),
                    loaded.series.incomplete_count()
                );
                *self.side_mut(polarization) = Some(loaded);
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("failed to load {polarization} file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the aligned table from whatever inputs are present.
    pub fn recompute(&mut self) {
        self.result = match (&self.copol, &self.xpol) {
            (Some(c), Some(x)) => Some(align(&c.series, &x.series, self.correction_db)),
            _ => None,
        };
    }

    /// Export the current table to `path` as legacy-header CSV.
    pub fn export_csv(&mut self, path: &Path) {
        let Some(table) = &self.result else {
            self.status_message = Some("Nothing to export yet".to_string());
            return;
        };
        match write_table(table, path) {
            Ok(()) => {
                log::info!("exported {} rows to {}", table.len(), path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn side_mut(&mut self, polarization: Polarization) -> &mut Option<LoadedFile> {
        match polarization {
            Polarization::CoPol => &mut self.copol,
            Polarization::CrossPol => &mut self.xpol,
        }
    }
}

fn ingest_file(
    path: &Path,
    polarization: Polarization,
    options: &IngestOptions,
) -> Result<LoadedFile> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let series = parse_series(&raw, polarization, options)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedFile { name, series })
}

fn write_table(table: &AlignedTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(table, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;

    fn loaded(polarization: Polarization, samples: &[(f64, f64)]) -> LoadedFile {
        LoadedFile {
            name: format!("{polarization}.csv"),
            series: Series::new(
                polarization,
                samples.iter().map(|&(a, p)| Sample::new(a, p)).collect(),
            ),
        }
    }

    #[test]
    fn recompute_requires_both_sides() {
        let mut state = AppState::default();
        state.recompute();
        assert!(state.result.is_none());

        state.copol = Some(loaded(Polarization::CoPol, &[(0.0, 10.0), (90.0, 12.0)]));
        state.recompute();
        assert!(state.result.is_none());

        state.xpol = Some(loaded(Polarization::CrossPol, &[(0.0, 4.0), (90.0, 5.0)]));
        state.recompute();
        let table = state.result.as_ref().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].rejection_db, 6.0);
    }

    #[test]
    fn correction_change_flows_into_result() {
        let mut state = AppState::default();
        state.copol = Some(loaded(Polarization::CoPol, &[(0.0, 10.0)]));
        state.xpol = Some(loaded(Polarization::CrossPol, &[(0.0, 4.0)]));
        state.recompute();
        assert_eq!(state.result.as_ref().unwrap().rows[0].rejection_db, 6.0);

        state.correction_db = 2.0;
        state.recompute();
        assert_eq!(state.result.as_ref().unwrap().rows[0].rejection_db, 4.0);
    }
}
