//! ARIMA parameter estimation.
//!
//! Fits the ARMA(p, q) structure
//! `w_t = c + Σ φ_i (w_{t-i} - c) + Σ θ_j ε_{t-j} + ε_t`
//! on the d-times differenced series by minimizing the conditional sum of
//! squared one-step prediction errors.

use crate::analysis::difference;
use crate::core::TimeSeries;
use crate::error::{AnalysisError, Result};
use crate::models::stability::{is_invertible, is_stationary};
use crate::utils::optimization::{minimize, SimplexOptions};
use crate::utils::stats::mean;
use chrono::{DateTime, Duration, Utc};

/// Relative threshold treating the differenced series as constant.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Box bound keeping candidate AR/MA coefficients away from the unit
/// circle during the search.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Model order specification (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Number of estimated parameters: AR + MA + intercept.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Convergence policy for the iterative parameter search.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Iteration cap; exceeding it without converging is an error.
    pub max_iterations: usize,
    /// Relative objective-improvement tolerance declaring convergence.
    pub tolerance: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-8,
        }
    }
}

impl EstimatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Fits ARIMA models; holds only the convergence policy.
#[derive(Debug, Clone, Default)]
pub struct ArimaEstimator {
    config: EstimatorConfig,
}

/// An immutable fitted ARIMA model.
///
/// Produced by [`ArimaEstimator::fit`]; refitting produces a new
/// instance. Carries everything forecasting needs: the coefficients, the
/// residual variance, the tail of the raw series for undifferencing, the
/// recent differenced values and residuals seeding the recursion, and
/// the calendar anchor (last timestamp and frequency) for dating steps.
#[derive(Debug, Clone)]
pub struct ArimaModel {
    order: ArimaOrder,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    residual_variance: f64,
    residuals: Vec<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    tail: Vec<f64>,
    recent_diff: Vec<f64>,
    last_timestamp: DateTime<Utc>,
    frequency: Duration,
    n_obs: usize,
}

impl ArimaModel {
    /// Model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fitted AR coefficients (length p).
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    /// Fitted MA coefficients (length q).
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    /// Mean of the differenced series.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// One-step prediction error variance of the fit.
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// In-sample residuals on the differenced scale; the first
    /// `max(p, q)` entries are zero by the conditioning convention.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Akaike information criterion, when the fit admits one.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Bayesian information criterion, when the fit admits one.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Last `d` raw observations, oldest first; seeds undifferencing.
    pub fn tail(&self) -> &[f64] {
        &self.tail
    }

    /// Last `p` differenced observations, oldest first; seeds the AR
    /// part of the forecast recursion.
    pub fn recent_diff(&self) -> &[f64] {
        &self.recent_diff
    }

    /// Timestamp of the last fitted observation.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    /// Step size used to date forecast steps.
    pub fn frequency(&self) -> Duration {
        self.frequency
    }

    /// Number of raw observations the model was fitted on.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }
}

impl ArimaEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Fit an ARIMA(p, d, q) model to `series`.
    ///
    /// The series must be gap-resolved and strictly longer than
    /// `p + d + q`. The differenced series must carry variation when any
    /// ARMA coefficient is requested. Fitted coefficients are checked for
    /// stationarity and invertibility before the model is returned.
    pub fn fit(&self, series: &TimeSeries, order: ArimaOrder) -> Result<ArimaModel> {
        let n = series.len();
        let min_len = order.p + order.d + order.q + 1;
        if n < min_len {
            return Err(AnalysisError::InsufficientData {
                needed: min_len,
                got: n,
            });
        }
        if series.has_missing_values() {
            return Err(AnalysisError::MissingValues);
        }

        let diffed = difference(series, order.d)?;
        let w = diffed.values();

        let (intercept, ar, ma) = self.estimate(w, order)?;

        if !is_stationary(&ar) {
            return Err(AnalysisError::NonStationaryModel);
        }
        if !is_invertible(&ma) {
            return Err(AnalysisError::NonInvertibleModel);
        }

        let residuals = one_step_residuals(w, &ar, &ma, intercept);
        let start = order.p.max(order.q);
        let n_eff = residuals.len() - start;
        let residual_variance = if n_eff > 0 {
            residuals[start..].iter().map(|r| r * r).sum::<f64>() / n_eff as f64
        } else {
            0.0
        };

        let (aic, bic) = information_criteria(residual_variance, n_eff, order.num_params());

        let last_timestamp = series
            .last_timestamp()
            .ok_or(AnalysisError::InsufficientData { needed: 1, got: 0 })?;
        let frequency = series.frequency().unwrap_or_else(|| Duration::days(1));

        let recent_diff = w[w.len() - order.p..].to_vec();

        Ok(ArimaModel {
            order,
            ar,
            ma,
            intercept,
            residual_variance,
            residuals,
            aic,
            bic,
            tail: diffed.tail().to_vec(),
            recent_diff,
            last_timestamp,
            frequency,
            n_obs: n,
        })
    }

    /// Estimate (intercept, AR, MA) on the differenced series.
    fn estimate(&self, w: &[f64], order: ArimaOrder) -> Result<(f64, Vec<f64>, Vec<f64>)> {
        let (p, q) = (order.p, order.q);
        let w_mean = mean(w);

        if p == 0 && q == 0 {
            return Ok((w_mean, vec![], vec![]));
        }

        // ARMA coefficients are unidentifiable on a constant series.
        let scale = w.iter().fold(1.0_f64, |acc, y| acc.max(y * y));
        let spread: f64 = w.iter().map(|y| (y - w_mean).powi(2)).sum::<f64>() / w.len() as f64;
        if spread <= scale * DEGENERACY_TOLERANCE {
            return Err(AnalysisError::DegenerateSeries(
                "differenced series is constant".to_string(),
            ));
        }

        let mut initial = Vec::with_capacity(order.num_params());
        initial.push(w_mean);
        for i in 0..p {
            initial.push(0.1 / (i + 1) as f64);
        }
        for j in 0..q {
            initial.push(0.05 / (j + 1) as f64);
        }

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(p + q));

        let options = SimplexOptions {
            max_iterations: self.config.max_iterations,
            tolerance: self.config.tolerance,
            ..Default::default()
        };

        let outcome = minimize(
            |params| {
                let intercept = params[0];
                let ar = &params[1..1 + p];
                let ma = &params[1 + p..];
                conditional_sum_of_squares(w, ar, ma, intercept)
            },
            &initial,
            Some(&bounds),
            options,
        );

        if !outcome.converged {
            return Err(AnalysisError::NonConvergence {
                iterations: outcome.iterations,
            });
        }

        let intercept = outcome.point[0];
        let ar = outcome.point[1..1 + p].to_vec();
        let ma = outcome.point[1 + p..].to_vec();
        Ok((intercept, ar, ma))
    }
}

/// Conditional sum of squared one-step prediction errors.
///
/// Conditions on the first `max(p, q)` observations and takes pre-sample
/// innovations as zero.
fn conditional_sum_of_squares(w: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> f64 {
    let residuals = one_step_residuals(w, ar, ma, intercept);
    let start = ar.len().max(ma.len());
    residuals[start..].iter().map(|r| r * r).sum()
}

/// One-step prediction errors under the given parameters. Entries before
/// `max(p, q)` stay zero.
fn one_step_residuals(w: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> Vec<f64> {
    let n = w.len();
    let start = ar.len().max(ma.len());
    let mut residuals = vec![0.0; n];

    for t in start..n {
        let mut pred = intercept;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (w[t - 1 - i] - intercept);
        }
        for (j, theta) in ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - j];
        }
        residuals[t] = w[t] - pred;
    }
    residuals
}

/// AIC/BIC under the Gaussian one-step likelihood; undefined for a
/// perfect (zero-variance) fit.
fn information_criteria(
    variance: f64,
    n_eff: usize,
    num_params: usize,
) -> (Option<f64>, Option<f64>) {
    if variance <= 0.0 || n_eff == 0 {
        return (None, None);
    }
    let n = n_eff as f64;
    let k = num_params as f64;
    let ll = -0.5 * n * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
    (Some(-2.0 * ll + 2.0 * k), Some(-2.0 * ll + k * n.ln()))
}
