//! Error metrics between modeled and measured daily energy.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Scalar comparison metrics for one model variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMetrics {
    /// Mean squared error (kWh²).
    pub mse: f64,
    /// Root mean squared error (kWh).
    pub rmse: f64,
    /// Mean absolute error (kWh).
    pub mae: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

/// Nearest modeled date to `date`, if any lies within `max_offset_days`.
///
/// An exact tie between the predecessor and successor resolves to the
/// earlier date.
fn nearest_within(
    modeled: &BTreeMap<NaiveDate, f64>,
    date: NaiveDate,
    max_offset_days: i64,
) -> Option<f64> {
    let after = modeled.range(date..).next();
    let before = modeled.range(..=date).next_back();

    let candidate = match (before, after) {
        (Some((&b, &bv)), Some((&a, &av))) => {
            if (date - b).num_days() <= (a - date).num_days() {
                Some((b, bv))
            } else {
                Some((a, av))
            }
        }
        (Some((&b, &bv)), None) => Some((b, bv)),
        (None, Some((&a, &av))) => Some((a, av)),
        (None, None) => None,
    };

    candidate.and_then(|(d, value)| {
        if (date - d).num_days().abs() <= max_offset_days {
            Some(value)
        } else {
            None
        }
    })
}

/// Aligns a modeled daily-energy series onto the measured series' dates
/// and computes MSE, RMSE, MAE, and R² of modeled vs. measured.
///
/// Alignment is nearest-match with a bounded tolerance: a measured date
/// pairs with the closest modeled date no more than `max_offset_days`
/// away, and unmatched dates are dropped. Neither input is mutated.
///
/// R² degenerates when the measured series has zero variance; it is
/// reported as 1.0 when the residuals are also zero, else 0.0.
///
/// # Errors
///
/// Returns [`Error::NoCommonDates`] when no measured date pairs with any
/// modeled date — computing metrics over an empty alignment would be
/// meaningless.
pub fn compare_daily(
    modeled: &BTreeMap<NaiveDate, f64>,
    measured: &BTreeMap<NaiveDate, f64>,
    max_offset_days: i64,
) -> Result<ErrorMetrics> {
    let pairs: Vec<(f64, f64)> = measured
        .iter()
        .filter_map(|(&date, &measured_kwh)| {
            nearest_within(modeled, date, max_offset_days)
                .map(|modeled_kwh| (modeled_kwh, measured_kwh))
        })
        .collect();

    if pairs.is_empty() {
        return Err(Error::NoCommonDates { max_offset_days });
    }

    let n = pairs.len() as f64;
    let mut sq_sum = 0.0;
    let mut abs_sum = 0.0;
    for &(modeled_kwh, measured_kwh) in &pairs {
        let err = modeled_kwh - measured_kwh;
        sq_sum += err * err;
        abs_sum += err.abs();
    }

    let measured_mean: f64 = pairs.iter().map(|&(_, m)| m).sum::<f64>() / n;
    let ss_tot: f64 = pairs
        .iter()
        .map(|&(_, m)| (m - measured_mean) * (m - measured_mean))
        .sum();

    let mse = sq_sum / n;
    let r_squared = if ss_tot > 0.0 {
        1.0 - sq_sum / ss_tot
    } else if sq_sum == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(ErrorMetrics {
        mse,
        rmse: mse.sqrt(),
        mae: abs_sum / n,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::Duration;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, day).unwrap()
    }

    fn series(values: &[(u32, f64)]) -> BTreeMap<NaiveDate, f64> {
        values.iter().map(|&(d, v)| (date(d), v)).collect()
    }

    #[test]
    fn identical_series_give_perfect_metrics() {
        let s = series(&[(1, 10.0), (2, 12.5), (3, 9.8)]);
        let metrics = compare_daily(&s, &s, 1).unwrap();
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r_squared, 1.0);
    }

    #[test]
    fn known_error_values() {
        let modeled = series(&[(1, 2.0), (2, 4.0)]);
        let measured = series(&[(1, 1.0), (2, 5.0)]);
        let metrics = compare_daily(&modeled, &measured, 0).unwrap();
        assert_relative_eq!(metrics.mse, 1.0);
        assert_relative_eq!(metrics.rmse, 1.0);
        assert_relative_eq!(metrics.mae, 1.0);
        assert_relative_eq!(metrics.r_squared, 0.75);
    }

    #[test]
    fn offset_dates_match_within_tolerance() {
        // Modeled dates sit one day before the measured ones.
        let modeled = series(&[(1, 10.0), (2, 12.0)]);
        let measured: BTreeMap<NaiveDate, f64> =
            modeled.iter().map(|(&d, &v)| (d + Duration::days(1), v)).collect();

        let metrics = compare_daily(&modeled, &measured, 1).unwrap();
        assert_abs_diff_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r_squared, 1.0);
    }

    #[test]
    fn distant_dates_are_not_matched() {
        let modeled = series(&[(1, 10.0)]);
        let measured = series(&[(20, 10.0)]);
        let result = compare_daily(&modeled, &measured, 1);
        assert!(matches!(result, Err(Error::NoCommonDates { .. })));
    }

    #[test]
    fn partial_overlap_uses_only_matched_pairs() {
        let modeled = series(&[(1, 10.0), (2, 12.0)]);
        let measured = series(&[(2, 12.0), (25, 99.0)]);
        let metrics = compare_daily(&modeled, &measured, 1).unwrap();
        // Day 25 is out of tolerance and dropped; day 2 matches exactly.
        assert_eq!(metrics.mae, 0.0);
    }

    #[test]
    fn zero_variance_measured_with_error_reports_zero_r_squared() {
        let modeled = series(&[(1, 5.0), (2, 5.0)]);
        let measured = series(&[(1, 4.0), (2, 4.0)]);
        let metrics = compare_daily(&modeled, &measured, 0).unwrap();
        assert_relative_eq!(metrics.mse, 1.0);
        assert_eq!(metrics.r_squared, 0.0);
    }

    #[test]
    fn tie_between_neighbors_prefers_earlier_date() {
        let modeled = series(&[(1, 100.0), (3, 200.0)]);
        let measured = series(&[(2, 100.0)]);
        let metrics = compare_daily(&modeled, &measured, 1).unwrap();
        // Day 2 is equidistant from days 1 and 3; day 1's value pairs.
        assert_eq!(metrics.mae, 0.0);
    }
}
