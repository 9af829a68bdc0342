use std::fmt;

use csv::ReaderBuilder;
use thiserror::Error;

use super::model::{Polarization, Sample, Series};

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Candidate names for one logical column.
///
/// `exact` entries are tried first, in order, and must match a header
/// verbatim (case-sensitive). `substrings` are the fallback: each is matched
/// case-insensitively against every header. Injected via [`IngestOptions`]
/// so callers can widen or replace the schema without touching the parser.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub exact: Vec<String>,
    pub substrings: Vec<String>,
}

impl ColumnSpec {
    pub fn new(exact: &[&str], substrings: &[&str]) -> Self {
        Self {
            exact: exact.iter().map(|s| s.to_string()).collect(),
            substrings: substrings.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Index of the first matching header, exact candidates first. A header
    /// already claimed by the other role is skipped, so one column never
    /// serves as both angle and power.
    fn resolve(&self, headers: &[String], claimed: Option<usize>) -> Option<usize> {
        let free = |idx: usize| Some(idx) != claimed;
        for cand in &self.exact {
            let hit = headers
                .iter()
                .enumerate()
                .find(|(idx, h)| free(*idx) && *h == cand);
            if let Some((idx, _)) = hit {
                return Some(idx);
            }
        }
        for sub in &self.substrings {
            let sub = sub.to_lowercase();
            let hit = headers
                .iter()
                .enumerate()
                .find(|(idx, h)| free(*idx) && h.to_lowercase().contains(&sub));
            if let Some((idx, _)) = hit {
                return Some(idx);
            }
        }
        None
    }

    fn candidates(&self) -> Vec<String> {
        self.exact
            .iter()
            .chain(self.substrings.iter())
            .cloned()
            .collect()
    }
}

/// Column-resolution configuration for both required columns.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub angle: ColumnSpec,
    pub power: ColumnSpec,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            angle: ColumnSpec::new(&["Azimuth"], &["azim", "ang"]),
            power: ColumnSpec::new(&["Power-dBm"], &["power", "gain"]),
        }
    }
}

/// Which logical column a [`FormatError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Angle,
    Power,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Angle => write!(f, "angle"),
            ColumnRole::Power => write!(f, "power"),
        }
    }
}

/// A required column could not be resolved. Fatal to the current request;
/// the UI surfaces it and halts processing for that file pair.
#[derive(Debug, Clone, Error)]
#[error("required {role} column not found in {polarization} file (candidates tried: {candidates:?})")]
pub struct FormatError {
    pub polarization: Polarization,
    pub role: ColumnRole,
    pub candidates: Vec<String>,
}

// ---------------------------------------------------------------------------
// Delimiter detection
// ---------------------------------------------------------------------------

/// Pick the field delimiter by raw occurrence count over the whole text:
/// `;` wins only when strictly more frequent than `,`.
///
/// This is a frequency heuristic, not a sniffing grammar: a quoted field
/// containing many of the non-chosen delimiter can fool it. Accepted
/// limitation; sweep exports in the wild carry no quoting.
pub fn detect_delimiter(text: &str) -> u8 {
    let semicolons = text.bytes().filter(|&b| b == b';').count();
    let commas = text.bytes().filter(|&b| b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the raw bytes of one uploaded file into a [`Series`].
///
/// Undecodable byte sequences become U+FFFD replacement characters (never an
/// error), the delimiter comes from [`detect_delimiter`], and the first row
/// is the header. Angle and power cells are coerced per cell: an unparseable
/// cell becomes a missing marker, not a failure. The only error is a
/// required column that cannot be resolved.
pub fn parse_series(
    raw: &[u8],
    polarization: Polarization,
    options: &IngestOptions,
) -> Result<Series, FormatError> {
    let text = String::from_utf8_lossy(raw);
    let delimiter = detect_delimiter(&text);
    log::debug!(
        "{polarization}: {} bytes, delimiter '{}'",
        raw.len(),
        delimiter as char
    );

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map(|h| {
            h.iter()
                .enumerate()
                .map(|(i, name)| normalize_header(name, i == 0))
                .collect()
        })
        .unwrap_or_default();

    let angle_idx =
        resolve_required(&options.angle, &headers, None, polarization, ColumnRole::Angle)?;
    let power_idx = resolve_required(
        &options.power,
        &headers,
        Some(angle_idx),
        polarization,
        ColumnRole::Power,
    )?;
    log::debug!(
        "{polarization}: angle column '{}', power column '{}'",
        headers[angle_idx],
        headers[power_idx]
    );

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // Header is line 1, records start at line 2.
                log::warn!("{polarization}: skipping unreadable line {}: {e}", idx + 2);
                skipped += 1;
                continue;
            }
        };
        samples.push(Sample::new(
            coerce_cell(record.get(angle_idx)),
            coerce_cell(record.get(power_idx)),
        ));
    }

    let series = Series::new(polarization, samples);
    log::info!(
        "{polarization}: {} samples ({} incomplete, {} records skipped)",
        series.len(),
        series.incomplete_count(),
        skipped
    );
    Ok(series)
}

fn resolve_required(
    spec: &ColumnSpec,
    headers: &[String],
    claimed: Option<usize>,
    polarization: Polarization,
    role: ColumnRole,
) -> Result<usize, FormatError> {
    spec.resolve(headers, claimed).ok_or_else(|| FormatError {
        polarization,
        role,
        candidates: spec.candidates(),
    })
}

/// Trim surrounding whitespace; additionally strip a leading U+FEFF BOM from
/// the first header cell, which Excel prepends to UTF-8 exports.
fn normalize_header(name: &str, first: bool) -> String {
    let name = if first {
        name.trim_start_matches('\u{feff}')
    } else {
        name
    };
    name.trim().to_string()
}

/// Tolerant numeric coercion: trim and parse as `f64`. Anything else,
/// including a field missing from a short row, becomes the missing marker.
/// Literal NaNs are canonicalized so missing values sort uniformly.
fn coerce_cell(cell: Option<&str>) -> f64 {
    match cell.map(|c| c.trim().parse::<f64>()) {
        Some(Ok(v)) if !v.is_nan() => v,
        _ => f64::NAN,
    }
}
