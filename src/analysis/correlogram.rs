//! Sample autocorrelation and partial autocorrelation diagnostics.

use crate::core::TimeSeries;
use crate::error::{AnalysisError, Result};
use crate::utils::stats::mean;

/// Relative threshold below which the lag-0 autocovariance or the
/// Durbin-Levinson prediction-error variance is treated as zero.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// An immutable sequence of `(lag, coefficient)` pairs for lags `0..=L`.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlogram {
    coefficients: Vec<f64>,
}

impl Correlogram {
    fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Largest lag covered.
    pub fn max_lag(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Coefficient at `lag`, if within range.
    pub fn coefficient(&self, lag: usize) -> Option<f64> {
        self.coefficients.get(lag).copied()
    }

    /// All coefficients, indexed by lag.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Iterate `(lag, coefficient)` pairs in lag order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.coefficients.iter().copied().enumerate()
    }
}

/// Sample autocorrelation function up to `max_lag` inclusive.
///
/// Autocovariances use the biased 1/n estimator
/// `c_k = (1/n) Σ (y_t - ȳ)(y_{t+k} - ȳ)`, normalized by `c_0`, so the
/// lag-0 coefficient is exactly 1. A constant (zero-variance) series is
/// reported as degenerate rather than producing NaN.
pub fn acf(series: &TimeSeries, max_lag: usize) -> Result<Correlogram> {
    autocovariance_ratios(series, max_lag).map(Correlogram::new)
}

/// Sample partial autocorrelation function up to `max_lag` inclusive.
///
/// Runs the Durbin-Levinson recursion on the ACF sequence: the order-k
/// partial coefficient is the last AR coefficient of the best order-k
/// linear predictor. The lag-0 value is 1 by convention and the lag-1
/// value equals the lag-1 ACF. A non-positive prediction-error variance
/// mid-recursion is reported as degenerate.
pub fn pacf(series: &TimeSeries, max_lag: usize) -> Result<Correlogram> {
    let rho = autocovariance_ratios(series, max_lag)?;

    let mut partials = vec![1.0];
    if max_lag == 0 {
        return Ok(Correlogram::new(partials));
    }

    // phi holds the order-(k-1) predictor coefficients phi_{k-1,1..k-1}.
    let mut phi = vec![rho[1]];
    let mut err = 1.0 - rho[1] * rho[1];
    partials.push(rho[1]);

    for k in 2..=max_lag {
        if err <= DEGENERACY_TOLERANCE {
            return Err(AnalysisError::DegenerateSeries(format!(
                "prediction-error variance vanished at order {}",
                k - 1
            )));
        }

        let mut num = rho[k];
        for j in 1..k {
            num -= phi[j - 1] * rho[k - j];
        }
        let reflection = num / err;

        let mut next = Vec::with_capacity(k);
        for j in 1..k {
            next.push(phi[j - 1] - reflection * phi[k - j - 1]);
        }
        next.push(reflection);

        phi = next;
        err *= 1.0 - reflection * reflection;
        partials.push(reflection);
    }

    Ok(Correlogram::new(partials))
}

/// Shared ACF computation returning raw coefficients indexed by lag.
fn autocovariance_ratios(series: &TimeSeries, max_lag: usize) -> Result<Vec<f64>> {
    let values = series.values();
    let n = values.len();

    // Sample autocovariance at lag >= n is undefined.
    if max_lag >= n {
        return Err(AnalysisError::InsufficientData {
            needed: max_lag + 1,
            got: n,
        });
    }
    if series.has_missing_values() {
        return Err(AnalysisError::MissingValues);
    }

    let m = mean(values);
    let c0: f64 = values.iter().map(|y| (y - m).powi(2)).sum::<f64>() / n as f64;

    let scale = values.iter().fold(1.0_f64, |acc, y| acc.max(y * y));
    if c0 <= scale * DEGENERACY_TOLERANCE {
        return Err(AnalysisError::DegenerateSeries(
            "zero variance".to_string(),
        ));
    }

    let mut rho = Vec::with_capacity(max_lag + 1);
    rho.push(1.0);
    for k in 1..=max_lag {
        let ck: f64 = (0..n - k)
            .map(|t| (values[t] - m) * (values[t + k] - m))
            .sum::<f64>()
            / n as f64;
        rho.push(ck / c0);
    }
    Ok(rho)
}
