//! Multi-step forecasting from a fitted ARIMA model.

use crate::analysis::integrate;
use crate::core::ForecastResult;
use crate::error::{AnalysisError, Result};
use crate::models::arima::ArimaModel;

/// Project a fitted model `horizon` steps ahead.
///
/// The ARMA recursion runs on the differenced scale with future
/// innovations taken as zero, then differencing is undone by cumulative
/// summation seeded with the model's stored tail values. The error
/// variance at step h is `σ² Σ_{j<h} ψ_j²`, where ψ are the moving-average
/// impulse-response weights of the fitted structure; it is non-decreasing
/// in the horizon by construction. Steps are dated by advancing the
/// model's calendar anchor one frequency unit at a time.
pub fn forecast(model: &ArimaModel, horizon: usize) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(AnalysisError::InvalidParameter(
            "forecast horizon must be at least 1".to_string(),
        ));
    }

    let order = model.order();
    let (p, q) = (order.p, order.q);
    let ar = model.ar();
    let ma = model.ma();
    let intercept = model.intercept();

    // Differenced-scale recursion, seeded with the fitted history.
    let mut w_hist = model.recent_diff().to_vec();
    let residuals = model.residuals();
    let mut e_hist = residuals[residuals.len().saturating_sub(q)..].to_vec();
    let mut diffs = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let mut pred = intercept;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (w_hist[w_hist.len() - 1 - i] - intercept);
        }
        for (j, theta) in ma.iter().enumerate() {
            pred += theta * e_hist[e_hist.len() - 1 - j];
        }
        w_hist.push(pred);
        e_hist.push(0.0);
        diffs.push(pred);
    }

    let points = integrate(&diffs, model.tail(), order.d);

    let psi = impulse_response(ar, ma, horizon);
    let sigma2 = model.residual_variance();
    let mut cumulative = 0.0;
    let variances: Vec<f64> = psi
        .iter()
        .map(|weight| {
            cumulative += weight * weight;
            sigma2 * cumulative
        })
        .collect();

    let timestamps = (1..=horizon)
        .map(|i| model.last_timestamp() + model.frequency() * i as i32)
        .collect();

    ForecastResult::new(timestamps, points, variances)
}

/// First `len` moving-average impulse-response weights ψ of an ARMA(p, q)
/// structure: ψ_0 = 1 and
/// `ψ_j = θ_j + Σ_{i=1..min(j,p)} φ_i ψ_{j-i}` with θ_j = 0 past q.
fn impulse_response(ar: &[f64], ma: &[f64], len: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(len);
    psi.push(1.0);
    for j in 1..len {
        let mut weight = if j <= ma.len() { ma[j - 1] } else { 0.0 };
        for (i, phi) in ar.iter().enumerate().take(j) {
            weight += phi * psi[j - 1 - i];
        }
        psi.push(weight);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use crate::models::arima::{ArimaEstimator, ArimaOrder};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        TimeSeries::with_frequency(timestamps, values, Some(Duration::days(1))).unwrap()
    }

    fn noisy_level_series(n: usize, level: f64) -> TimeSeries {
        make_series(
            (0..n)
                .map(|i| level + (i as f64 * 1.3).sin() * 0.05)
                .collect(),
        )
    }

    #[test]
    fn impulse_response_pure_ar1() {
        // psi_j = phi^j for AR(1).
        let psi = impulse_response(&[0.5], &[], 5);
        let expected = [1.0, 0.5, 0.25, 0.125, 0.0625];
        for (a, b) in psi.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn impulse_response_pure_ma() {
        // psi cuts off after q for a pure MA model.
        let psi = impulse_response(&[], &[0.4, 0.2], 5);
        assert_relative_eq!(psi[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(psi[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(psi[2], 0.2, epsilon = 1e-12);
        assert_relative_eq!(psi[3], 0.0, epsilon = 1e-12);
        assert_relative_eq!(psi[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn impulse_response_arma11() {
        // psi_1 = phi + theta, psi_j = phi * psi_{j-1} afterwards.
        let psi = impulse_response(&[0.6], &[0.3], 4);
        assert_relative_eq!(psi[1], 0.9, epsilon = 1e-12);
        assert_relative_eq!(psi[2], 0.54, epsilon = 1e-12);
        assert_relative_eq!(psi[3], 0.324, epsilon = 1e-12);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let series = noisy_level_series(60, 100.0);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(0, 1, 0))
            .unwrap();
        assert!(matches!(
            forecast(&model, 0),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn random_walk_forecast_holds_last_level() {
        // ARIMA(0,1,0) on a flat series forecasts the last observation.
        let series = make_series(vec![42.0; 50]);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(0, 1, 0))
            .unwrap();
        let result = forecast(&model, 10).unwrap();

        assert_eq!(result.horizon(), 10);
        for &point in result.points() {
            assert_relative_eq!(point, 42.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn flat_series_forecast_stays_near_last_level() {
        let series = noisy_level_series(200, 100.0);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(1, 1, 1))
            .unwrap();
        let result = forecast(&model, 10).unwrap();

        let last = series.last_value().unwrap();
        for &point in result.points() {
            assert!(
                (point - last).abs() < 1.0,
                "forecast {point} strayed from level {last}"
            );
        }
    }

    #[test]
    fn error_variance_is_non_decreasing() {
        let mut values = vec![80.0];
        for i in 1..250 {
            let prev = values[i - 1];
            values.push(80.0 + 0.5 * (prev - 80.0) + (i as f64 * 0.77).sin());
        }
        let series = make_series(values);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(1, 0, 1))
            .unwrap();
        let result = forecast(&model, 20).unwrap();

        for pair in result.variances().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(result.variances()[0] > 0.0);
    }

    #[test]
    fn ar1_variance_matches_closed_form() {
        let mut values = vec![10.0];
        for i in 1..300 {
            let prev = values[i - 1];
            values.push(0.7 * prev + 3.0 + (i as f64 * 1.1).sin() * 0.5);
        }
        let series = make_series(values);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(1, 0, 0))
            .unwrap();
        let result = forecast(&model, 5).unwrap();

        // Var(h) = sigma^2 * sum_{j<h} phi^(2j) for AR(1).
        let phi = model.ar()[0];
        let sigma2 = model.residual_variance();
        let mut expected = 0.0;
        for (h, &variance) in result.variances().iter().enumerate() {
            expected += phi.powi(2 * h as i32);
            assert_relative_eq!(variance, sigma2 * expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn first_step_undifferencing_round_trip() {
        let mut values = vec![20.0];
        for i in 1..120 {
            let prev = values[i - 1];
            values.push(prev + 0.3 + (i as f64 * 0.9).sin());
        }
        let series = make_series(values);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(1, 1, 0))
            .unwrap();
        let result = forecast(&model, 3).unwrap();

        // Recompute the first differenced-scale step by hand and add it to
        // the last observed level.
        let phi = model.ar()[0];
        let c = model.intercept();
        let w_last = model.recent_diff()[model.recent_diff().len() - 1];
        let first_diff = c + phi * (w_last - c);
        let last_level = series.last_value().unwrap();
        assert_relative_eq!(
            result.points()[0],
            last_level + first_diff,
            epsilon = 1e-10
        );
    }

    #[test]
    fn forecast_steps_are_dated_by_frequency() {
        let series = noisy_level_series(80, 50.0);
        let model = ArimaEstimator::new()
            .fit(&series, ArimaOrder::new(0, 1, 0))
            .unwrap();
        let result = forecast(&model, 3).unwrap();

        let last = series.last_timestamp().unwrap();
        assert_eq!(result.timestamps()[0], last + Duration::days(1));
        assert_eq!(result.timestamps()[2], last + Duration::days(3));
    }
}
