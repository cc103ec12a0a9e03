//! Differencing: the stationarity-inducing transform and its inverse.

use crate::core::TimeSeries;
use crate::error::{AnalysisError, Result};

/// A d-th order differenced series.
///
/// Holds the transformed series (length `n - d`, first `d` timestamps
/// dropped) together with the differencing order and the last `d` values
/// of the originating series, which seed the reconstruction of level
/// forecasts from differenced ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencedSeries {
    series: TimeSeries,
    order: usize,
    tail: Vec<f64>,
}

impl DifferencedSeries {
    /// The differenced observations as a series.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Differencing order applied.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Last `order` values of the originating series, oldest first.
    pub fn tail(&self) -> &[f64] {
        &self.tail
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Differenced values.
    pub fn values(&self) -> &[f64] {
        self.series.values()
    }
}

/// Apply the first-difference operator `d` times to a series.
///
/// Each pass computes `y'_t = y_t - y_{t-1}` and drops the leading,
/// now-undefined point. `d = 0` returns the input unchanged, by value.
/// Gaps must have been resolved beforehand (see
/// [`TimeSeries::regularized`](crate::core::TimeSeries::regularized)).
pub fn difference(series: &TimeSeries, d: usize) -> Result<DifferencedSeries> {
    if series.len() <= d {
        return Err(AnalysisError::InsufficientData {
            needed: d + 1,
            got: series.len(),
        });
    }
    if series.has_missing_values() {
        return Err(AnalysisError::MissingValues);
    }

    if d == 0 {
        return Ok(DifferencedSeries {
            series: series.clone(),
            order: 0,
            tail: vec![],
        });
    }

    let tail = series.values()[series.len() - d..].to_vec();

    let mut values = series.values().to_vec();
    for _ in 0..d {
        values = values.windows(2).map(|w| w[1] - w[0]).collect();
    }
    let timestamps = series.timestamps()[d..].to_vec();
    let series = TimeSeries::with_frequency(timestamps, values, series.frequency())?;

    Ok(DifferencedSeries {
        series,
        order: d,
        tail,
    })
}

/// Reverse `d`-order differencing by repeated cumulative summation.
///
/// `tail` holds the last `d` observations of the original series, oldest
/// first, exactly as recorded by [`DifferencedSeries::tail`]. Returns the
/// reconstructed values on the original scale.
pub fn integrate(diffs: &[f64], tail: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || diffs.is_empty() {
        return diffs.to_vec();
    }
    debug_assert_eq!(tail.len(), d);

    // Seed for level k is the last element of the k-th difference of the
    // tail; only the last d raw values are needed to derive all of them.
    let mut seeds = Vec::with_capacity(d);
    let mut scratch = tail.to_vec();
    for _ in 0..d {
        seeds.push(*scratch.last().unwrap_or(&0.0));
        scratch = scratch.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let mut result = diffs.to_vec();
    for level in (0..d).rev() {
        let mut cumsum = seeds[level];
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        TimeSeries::with_frequency(timestamps, values, Some(Duration::days(1))).unwrap()
    }

    #[test]
    fn order_zero_is_identity_by_value() {
        let series = make_series(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let diffed = difference(&series, 0).unwrap();
        assert_eq!(diffed.order(), 0);
        assert!(diffed.tail().is_empty());
        assert_eq!(diffed.series(), &series);
    }

    #[test]
    fn first_difference_of_cumulative_series() {
        let series = make_series(vec![1.0, 3.0, 6.0, 10.0, 15.0]);
        let diffed = difference(&series, 1).unwrap();
        assert_eq!(diffed.values(), &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(diffed.tail(), &[15.0]);
        // Leading timestamp is dropped.
        assert_eq!(diffed.series().timestamps()[0], series.timestamps()[1]);
    }

    #[test]
    fn second_difference() {
        let series = make_series(vec![1.0, 3.0, 6.0, 10.0, 15.0]);
        let diffed = difference(&series, 2).unwrap();
        assert_eq!(diffed.values(), &[1.0, 1.0, 1.0]);
        assert_eq!(diffed.tail(), &[10.0, 15.0]);
    }

    #[test]
    fn linear_trend_differences_to_its_slope() {
        let series = make_series((1..=100).map(|i| i as f64).collect());
        let diffed = difference(&series, 1).unwrap();
        for &v in diffed.values() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn repeated_differencing_composes() {
        let values: Vec<f64> = (0..40).map(|i| (i as f64 * 0.37).sin() * 10.0 + i as f64).collect();
        let series = make_series(values);

        let once = difference(&series, 1).unwrap();
        let once_then_twice = difference(once.series(), 2).unwrap();
        let thrice = difference(&series, 3).unwrap();
        assert_eq!(once_then_twice.series(), thrice.series());
    }

    #[test]
    fn too_short_series_is_rejected() {
        let series = make_series(vec![1.0, 2.0]);
        assert!(matches!(
            difference(&series, 2),
            Err(AnalysisError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn unresolved_gaps_are_rejected() {
        let series = make_series(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(
            difference(&series, 1),
            Err(AnalysisError::MissingValues)
        ));
    }

    #[test]
    fn integrate_reverses_first_difference() {
        let series = make_series(vec![10.0, 12.0, 15.0, 19.0, 24.0]);
        let diffed = difference(&series, 1).unwrap();

        let future_diffs = vec![6.0, 7.0];
        let levels = integrate(&future_diffs, diffed.tail(), 1);
        assert_relative_eq!(levels[0], 30.0, epsilon = 1e-12);
        assert_relative_eq!(levels[1], 37.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_reverses_second_difference() {
        // Quadratic: second differences are constant 2.
        let series = make_series((0..6).map(|i| (i * i) as f64).collect());
        let diffed = difference(&series, 2).unwrap();
        for &v in diffed.values() {
            assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        }

        // Continuing the pattern must continue the quadratic: 36, 49.
        let levels = integrate(&[2.0, 2.0], diffed.tail(), 2);
        assert_relative_eq!(levels[0], 36.0, epsilon = 1e-12);
        assert_relative_eq!(levels[1], 49.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_order_zero_passthrough() {
        let diffs = vec![1.0, 2.0, 3.0];
        assert_eq!(integrate(&diffs, &[], 0), diffs);
    }
}
