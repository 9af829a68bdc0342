use std::fmt;

// ---------------------------------------------------------------------------
// Polarization – which of the two measurement files a series came from
// ---------------------------------------------------------------------------

/// Side of a polarization measurement pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    /// Same polarization as the transmitted reference.
    CoPol,
    /// Orthogonal polarization.
    CrossPol,
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarization::CoPol => write!(f, "co-pol"),
            Polarization::CrossPol => write!(f, "cross-pol"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sample – one (angle, power) pair of a sweep
// ---------------------------------------------------------------------------

/// A single sweep sample. `NaN` in either field is the missing-value marker
/// produced by tolerant cell coercion; such samples survive ingestion but are
/// excluded from interpolation input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Angle in degrees. Not necessarily bounded to [0, 360).
    pub angle_deg: f64,
    /// Measured power in dBm.
    pub power_dbm: f64,
}

impl Sample {
    pub fn new(angle_deg: f64, power_dbm: f64) -> Self {
        Self {
            angle_deg,
            power_dbm,
        }
    }

    /// Whether both fields carry usable numeric values.
    pub fn is_complete(&self) -> bool {
        !self.angle_deg.is_nan() && !self.power_dbm.is_nan()
    }
}

// ---------------------------------------------------------------------------
// Series – all samples of one polarization, from one file
// ---------------------------------------------------------------------------

/// The ordered samples of one uploaded file.
///
/// Samples are kept ascending by angle with missing angles sorting last;
/// missing-value markers are retained here and only dropped by the alignment
/// engine's local filtering.
#[derive(Debug, Clone)]
pub struct Series {
    pub polarization: Polarization,
    pub samples: Vec<Sample>,
}

impl Series {
    /// Build a series, sorting samples ascending by angle. The sort is total
    /// (and stable), so missing angles land after every numeric angle.
    pub fn new(polarization: Polarization, mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));
        Self {
            polarization,
            samples,
        }
    }

    /// Number of samples, incomplete ones included.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples with both angle and power present.
    pub fn complete_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_complete()).count()
    }

    /// Samples dropped by the alignment engine's filtering.
    pub fn incomplete_count(&self) -> usize {
        self.len() - self.complete_count()
    }

    /// (min, max) angle over complete samples, if any.
    pub fn angle_span(&self) -> Option<(f64, f64)> {
        let mut angles = self
            .samples
            .iter()
            .filter(|s| s.is_complete())
            .map(|s| s.angle_deg);
        let first = angles.next()?;
        let (min, max) = angles.fold((first, first), |(lo, hi), a| (lo.min(a), hi.max(a)));
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// AlignedTable – the engine's output, one row per grid angle
// ---------------------------------------------------------------------------

/// One row of the aligned result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    /// Grid angle in degrees.
    pub angle_deg: f64,
    /// Co-pol power interpolated onto the grid.
    pub copol_dbm: f64,
    /// Cross-pol power interpolated onto the grid, correction applied.
    pub xpol_dbm: f64,
    /// `copol_dbm - xpol_dbm`; `NaN` when either operand is missing.
    pub rejection_db: f64,
}

/// The aligned result table. Rows are strictly ascending by angle with no
/// duplicates; immutable once produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedTable {
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lowest finite rejection and the angle it occurs at (the worst-case
    /// polarization purity of the pattern).
    pub fn worst_rejection(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .filter(|r| r.rejection_db.is_finite())
            .map(|r| (r.angle_deg, r.rejection_db))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Per-column summary statistics over all rows.
    pub fn summary(&self) -> TableSummary {
        let col = |f: fn(&AlignedRow) -> f64| {
            ColumnSummary::from_values(self.rows.iter().map(f).collect::<Vec<_>>().as_slice())
        };
        TableSummary {
            angle: col(|r| r.angle_deg),
            copol: col(|r| r.copol_dbm),
            xpol: col(|r| r.xpol_dbm),
            rejection: col(|r| r.rejection_db),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column, missing values skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); `NaN` below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Compute the summary, ignoring `NaN` entries.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let count = sorted.len();

        if count == 0 {
            return Self {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.50),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

/// Summary of all four table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub angle: ColumnSummary,
    pub copol: ColumnSummary,
    pub xpol: ColumnSummary,
    pub rejection: ColumnSummary,
}

/// Linearly interpolated quantile of an ascending slice, `p` in [0, 1].
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_sorts_ascending_missing_angles_last() {
        let series = Series::new(
            Polarization::CoPol,
            vec![
                Sample::new(90.0, 1.0),
                Sample::new(f64::NAN, 2.0),
                Sample::new(-10.0, 3.0),
                Sample::new(45.0, f64::NAN),
            ],
        );
        let angles: Vec<f64> = series.samples.iter().map(|s| s.angle_deg).collect();
        assert_eq!(angles[0], -10.0);
        assert_eq!(angles[1], 45.0);
        assert_eq!(angles[2], 90.0);
        assert!(angles[3].is_nan());
        assert_eq!(series.complete_count(), 2);
        assert_eq!(series.incomplete_count(), 2);
    }

    #[test]
    fn angle_span_ignores_incomplete_samples() {
        let series = Series::new(
            Polarization::CrossPol,
            vec![
                Sample::new(0.0, -30.0),
                Sample::new(180.0, f64::NAN),
                Sample::new(120.0, -35.0),
            ],
        );
        assert_eq!(series.angle_span(), Some((0.0, 120.0)));

        let empty = Series::new(Polarization::CrossPol, Vec::new());
        assert_eq!(empty.angle_span(), None);
    }

    #[test]
    fn worst_rejection_skips_nan_rows() {
        let table = AlignedTable {
            rows: vec![
                AlignedRow {
                    angle_deg: 0.0,
                    copol_dbm: 10.0,
                    xpol_dbm: 4.0,
                    rejection_db: 6.0,
                },
                AlignedRow {
                    angle_deg: 90.0,
                    copol_dbm: f64::NAN,
                    xpol_dbm: 5.0,
                    rejection_db: f64::NAN,
                },
                AlignedRow {
                    angle_deg: 180.0,
                    copol_dbm: 8.0,
                    xpol_dbm: 5.0,
                    rejection_db: 3.0,
                },
            ],
        };
        assert_eq!(table.worst_rejection(), Some((180.0, 3.0)));
    }

    #[test]
    fn summary_matches_hand_computed_stats() {
        let s = ColumnSummary::from_values(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // Sample std of 1..4 = sqrt(5/3)
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn summary_skips_missing_values() {
        let s = ColumnSummary::from_values(&[f64::NAN, 5.0, f64::NAN, 7.0]);
        assert_eq!(s.count, 2);
        assert!((s.mean - 6.0).abs() < 1e-12);
        assert_eq!(s.min, 5.0);
        assert_eq!(s.max, 7.0);
    }

    #[test]
    fn summary_of_empty_column_is_all_nan() {
        let s = ColumnSummary::from_values(&[f64::NAN, f64::NAN]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
        assert!(s.std.is_nan());
        assert!(s.min.is_nan());
        assert!(s.max.is_nan());
    }

    #[test]
    fn single_value_summary_has_nan_std() {
        let s = ColumnSummary::from_values(&[3.5]);
        assert_eq!(s.count, 1);
        assert!((s.mean - 3.5).abs() < 1e-12);
        assert!(s.std.is_nan());
        assert_eq!(s.median, 3.5);
    }
}
