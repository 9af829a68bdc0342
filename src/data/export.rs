use std::io;

use anyhow::Result;
use serde::Serialize;

use super::model::AlignedTable;

/// Column names expected by the downstream report tooling. The order is part
/// of the contract.
pub const LEGACY_HEADERS: [&str; 4] = [
    "Azimuth",
    "Power-dBm_copol",
    "Power-dBm_xpol",
    "Rejeicao_dB",
];

#[derive(Serialize)]
struct ExportRow {
    azimuth: f64,
    copol: Option<f64>,
    xpol: Option<f64>,
    rejection: Option<f64>,
}

/// Serialize the aligned table as comma-separated UTF-8.
///
/// Missing power or rejection values become empty cells. The header row is
/// always present, even for an empty table, and every line ends in `\n`.
pub fn write_csv<W: io::Write>(table: &AlignedTable, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    write_rows(table, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// [`write_csv`] into a fresh byte buffer.
pub fn to_csv_bytes(table: &AlignedTable) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write_rows(table, &mut wtr)?;
    Ok(wtr.into_inner()?)
}

fn write_rows<W: io::Write>(table: &AlignedTable, wtr: &mut csv::Writer<W>) -> Result<()> {
    wtr.write_record(LEGACY_HEADERS)?;
    for row in &table.rows {
        wtr.serialize(ExportRow {
            azimuth: row.angle_deg,
            copol: cell(row.copol_dbm),
            xpol: cell(row.xpol_dbm),
            rejection: cell(row.rejection_db),
        })?;
    }
    Ok(())
}

/// Map `NaN` to an absent cell; everything else exports as-is.
fn cell(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}
