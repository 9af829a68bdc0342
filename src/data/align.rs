use super::model::{AlignedRow, AlignedTable, Sample, Series};

// ---------------------------------------------------------------------------
// Grid alignment & rejection
// ---------------------------------------------------------------------------

/// Align two polarization series onto their common angular grid and compute
/// the per-angle rejection.
///
/// Both series are borrowed read-only; samples with missing angle or power
/// are dropped by filtering local to this call. The grid is the sorted union
/// of the filtered angles of both inputs. Each series is interpolated onto
/// the grid (flat clamp outside its sampled span), `correction_db` is added
/// uniformly to the cross-pol values, and rejection is co-pol minus the
/// corrected cross-pol. Missing values propagate as `NaN`, never as errors.
///
/// The computation is deterministic: identical inputs produce bit-identical
/// tables.
pub fn align(copol: &Series, xpol: &Series, correction_db: f64) -> AlignedTable {
    let copol_input = interpolation_input(copol);
    let xpol_input = interpolation_input(xpol);

    let grid = build_grid(&copol_input, &xpol_input);
    let copol_on_grid = interp_to_grid(&copol_input, &grid);
    let xpol_on_grid = interp_to_grid(&xpol_input, &grid);

    let rows = grid
        .iter()
        .zip(copol_on_grid.iter().zip(xpol_on_grid.iter()))
        .map(|(&angle_deg, (&copol_dbm, &xpol_raw))| {
            let xpol_dbm = xpol_raw + correction_db;
            AlignedRow {
                angle_deg,
                copol_dbm,
                xpol_dbm,
                rejection_db: copol_dbm - xpol_dbm,
            }
        })
        .collect();

    AlignedTable { rows }
}

/// Complete samples of one series, ascending by angle with duplicate angles
/// collapsed to the last-seen sample. The series itself is untouched.
fn interpolation_input(series: &Series) -> Vec<Sample> {
    let mut points: Vec<Sample> = series
        .samples
        .iter()
        .copied()
        .filter(Sample::is_complete)
        .collect();
    // Stable sort, so "last seen" below is well defined even for input that
    // arrives unsorted.
    points.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));
    points.dedup_by(|next, kept| {
        if next.angle_deg == kept.angle_deg {
            *kept = *next;
            true
        } else {
            false
        }
    });
    points
}

/// Sorted exact-equality union of the angles of both filtered inputs.
fn build_grid(copol: &[Sample], xpol: &[Sample]) -> Vec<f64> {
    let mut grid: Vec<f64> = copol
        .iter()
        .chain(xpol.iter())
        .map(|s| s.angle_deg)
        .collect();
    grid.sort_by(|a, b| a.total_cmp(b));
    grid.dedup();
    grid
}

/// Interpolate an ascending, strictly deduplicated input onto `grid`.
///
/// Grid angles within the sampled span get the linear interpolation between
/// their bracketing samples (exact at sample angles). Angles below the first
/// sample clamp to its power, angles above the last clamp to its power:
/// flat lines, never linear extrapolation. An empty input maps every grid
/// angle to `NaN`.
fn interp_to_grid(points: &[Sample], grid: &[f64]) -> Vec<f64> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return vec![f64::NAN; grid.len()];
    };

    grid.iter()
        .map(|&g| {
            if g <= first.angle_deg {
                first.power_dbm
            } else if g >= last.angle_deg {
                last.power_dbm
            } else {
                let hi_idx = points.partition_point(|p| p.angle_deg < g);
                let hi = points[hi_idx];
                if hi.angle_deg == g {
                    hi.power_dbm
                } else {
                    let lo = points[hi_idx - 1];
                    let frac = (g - lo.angle_deg) / (hi.angle_deg - lo.angle_deg);
                    lo.power_dbm + frac * (hi.power_dbm - lo.power_dbm)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Polarization;

    fn copol(samples: &[(f64, f64)]) -> Series {
        series(Polarization::CoPol, samples)
    }

    fn xpol(samples: &[(f64, f64)]) -> Series {
        series(Polarization::CrossPol, samples)
    }

    fn series(pol: Polarization, samples: &[(f64, f64)]) -> Series {
        Series::new(
            pol,
            samples.iter().map(|&(a, p)| Sample::new(a, p)).collect(),
        )
    }

    #[test]
    fn worked_example_with_correction() {
        let c = copol(&[(0.0, 10.0), (90.0, 12.0), (180.0, 8.0)]);
        let x = xpol(&[(0.0, 4.0), (90.0, 5.0), (180.0, 3.0)]);
        let table = align(&c, &x, 1.0);

        let angles: Vec<f64> = table.rows.iter().map(|r| r.angle_deg).collect();
        assert_eq!(angles, vec![0.0, 90.0, 180.0]);

        let corrected: Vec<f64> = table.rows.iter().map(|r| r.xpol_dbm).collect();
        assert_eq!(corrected, vec![5.0, 6.0, 4.0]);

        let rejection: Vec<f64> = table.rows.iter().map(|r| r.rejection_db).collect();
        assert_eq!(rejection, vec![5.0, 6.0, 4.0]);
    }

    #[test]
    fn grid_is_sorted_union_without_duplicates() {
        let c = copol(&[(0.0, 1.0), (90.0, 2.0), (180.0, 3.0)]);
        let x = xpol(&[(45.0, 0.5), (90.0, 0.6), (270.0, 0.7)]);
        let table = align(&c, &x, 0.0);

        let angles: Vec<f64> = table.rows.iter().map(|r| r.angle_deg).collect();
        assert_eq!(angles, vec![0.0, 45.0, 90.0, 180.0, 270.0]);
        for pair in angles.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn missing_grid_angle_is_linearly_interpolated() {
        // Cross-pol has no 45° sample; it interpolates between 0° and 90°.
        let c = copol(&[(0.0, 10.0), (45.0, 11.0), (90.0, 12.0)]);
        let x = xpol(&[(0.0, 4.0), (90.0, 5.0)]);
        let table = align(&c, &x, 0.0);

        let at_45 = table.rows.iter().find(|r| r.angle_deg == 45.0).unwrap();
        assert_eq!(at_45.xpol_dbm, 4.5);
        assert_eq!(at_45.rejection_db, 6.5);
    }

    #[test]
    fn collinear_points_interpolate_exactly() {
        let c = copol(&[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)]);
        let x = xpol(&[(5.0, 0.0), (15.0, 0.0)]);
        let table = align(&c, &x, 0.0);

        let at = |angle: f64| {
            table
                .rows
                .iter()
                .find(|r| r.angle_deg == angle)
                .unwrap()
                .copol_dbm
        };
        assert_eq!(at(5.0), 5.0);
        assert_eq!(at(15.0), 15.0);
    }

    #[test]
    fn boundary_angles_clamp_flat() {
        // Cross-pol spans a wider sweep; co-pol must clamp, not extrapolate.
        let c = copol(&[(0.0, 10.0), (90.0, 12.0)]);
        let x = xpol(&[(-45.0, 1.0), (0.0, 2.0), (90.0, 3.0), (135.0, 4.0)]);
        let table = align(&c, &x, 0.0);

        let copol_col: Vec<f64> = table.rows.iter().map(|r| r.copol_dbm).collect();
        // Linear extrapolation would give 9.0 at -45° and 13.0 at 135°.
        assert_eq!(copol_col, vec![10.0, 10.0, 12.0, 12.0]);
    }

    #[test]
    fn single_sample_series_clamps_everywhere() {
        let c = copol(&[(0.0, 10.0), (90.0, 12.0)]);
        let x = xpol(&[(45.0, 7.0)]);
        let table = align(&c, &x, 0.0);

        let xpol_col: Vec<f64> = table.rows.iter().map(|r| r.xpol_dbm).collect();
        assert_eq!(xpol_col, vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn zero_correction_is_neutral() {
        let c = copol(&[(0.0, 10.0), (90.0, 12.0)]);
        let x = xpol(&[(0.0, 4.0), (90.0, 5.0)]);
        let table = align(&c, &x, 0.0);

        assert_eq!(table.rows[0].xpol_dbm, 4.0);
        assert_eq!(table.rows[1].xpol_dbm, 5.0);
    }

    #[test]
    fn negative_correction_is_applied_uniformly() {
        let c = copol(&[(0.0, 10.0)]);
        let x = xpol(&[(0.0, 4.0)]);
        let table = align(&c, &x, -2.5);

        assert_eq!(table.rows[0].xpol_dbm, 1.5);
        assert_eq!(table.rows[0].rejection_db, 8.5);
    }

    #[test]
    fn align_is_idempotent_bit_for_bit() {
        let c = copol(&[(0.0, 10.0), (33.7, 11.3), (90.0, 12.0), (181.5, 7.9)]);
        let x = xpol(&[(10.0, 4.2), (75.0, 5.1), (200.0, 2.8)]);

        let first = align(&c, &x, 1.7);
        let second = align(&c, &x, 1.7);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_cross_pol_propagates_nan_rejection() {
        let c = copol(&[(0.0, 10.0), (90.0, 12.0)]);
        let x = xpol(&[]);
        let table = align(&c, &x, 1.0);

        assert_eq!(table.len(), 2);
        for row in &table.rows {
            assert!(!row.copol_dbm.is_nan());
            assert!(row.xpol_dbm.is_nan());
            assert!(row.rejection_db.is_nan());
        }
    }

    #[test]
    fn all_missing_samples_behave_like_empty_series() {
        let c = copol(&[(0.0, 10.0)]);
        let x = xpol(&[(f64::NAN, 4.0), (45.0, f64::NAN)]);
        let table = align(&c, &x, 0.0);

        // Only the co-pol angle makes it onto the grid.
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].angle_deg, 0.0);
        assert!(table.rows[0].rejection_db.is_nan());
    }

    #[test]
    fn incomplete_samples_are_excluded_without_mutating_series() {
        let c = copol(&[(0.0, 10.0), (45.0, f64::NAN), (90.0, 12.0)]);
        let x = xpol(&[(0.0, 4.0), (90.0, 5.0)]);
        let table = align(&c, &x, 0.0);

        // 45° is dropped from the co-pol input, so it never reaches the grid.
        let angles: Vec<f64> = table.rows.iter().map(|r| r.angle_deg).collect();
        assert_eq!(angles, vec![0.0, 90.0]);
        // The series still carries its incomplete sample afterwards.
        assert_eq!(c.len(), 3);
        assert_eq!(c.incomplete_count(), 1);
    }

    #[test]
    fn duplicate_angles_collapse_to_last_seen() {
        let c = copol(&[(0.0, 10.0), (0.0, 20.0), (90.0, 12.0)]);
        let x = xpol(&[(0.0, 4.0), (90.0, 5.0)]);
        let table = align(&c, &x, 0.0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].copol_dbm, 20.0);
    }

    #[test]
    fn clamping_fills_disjoint_ranges_without_nan() {
        // Non-overlapping sweeps still produce a fully populated table.
        let c = copol(&[(0.0, 10.0), (45.0, 11.0)]);
        let x = xpol(&[(100.0, 4.0), (140.0, 5.0)]);
        let table = align(&c, &x, 0.0);

        assert_eq!(table.len(), 4);
        for row in &table.rows {
            assert!(!row.rejection_db.is_nan());
        }
        assert_eq!(table.rows[3].copol_dbm, 11.0);
        assert_eq!(table.rows[0].xpol_dbm, 4.0);
    }
}
