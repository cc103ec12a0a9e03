//! Forecast result structure: dated point estimates with error variances.

use crate::error::{AnalysisError, Result};
use crate::utils::stats::quantile_normal;
use chrono::{DateTime, Utc};

/// Out-of-sample forecast on the original (price) scale.
///
/// One entry per step 1..=H: the step's timestamp, the point estimate,
/// and the forecast error variance, which is non-decreasing in the
/// horizon. Transient: produced per forecast request, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    timestamps: Vec<DateTime<Utc>>,
    points: Vec<f64>,
    variances: Vec<f64>,
}

impl ForecastResult {
    /// Assemble a forecast from parallel step vectors.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        points: Vec<f64>,
        variances: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.len() != points.len() || points.len() != variances.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "forecast step vectors disagree in length: {} timestamps, {} points, {} variances",
                timestamps.len(),
                points.len(),
                variances.len()
            )));
        }
        if variances.iter().any(|v| *v < 0.0) {
            return Err(AnalysisError::InvalidParameter(
                "forecast error variance must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            timestamps,
            points,
            variances,
        })
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Step timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point estimates.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Forecast error variances.
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// A single step as `(timestamp, point, variance)`, zero-indexed.
    pub fn step(&self, index: usize) -> Option<(DateTime<Utc>, f64, f64)> {
        if index < self.horizon() {
            Some((
                self.timestamps[index],
                self.points[index],
                self.variances[index],
            ))
        } else {
            None
        }
    }

    /// Symmetric normal-quantile prediction band at the given confidence
    /// level (e.g. 0.95), as `(lower, upper)` vectors.
    pub fn interval(&self, level: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        if !(0.0..1.0).contains(&level) || level <= 0.0 {
            return Err(AnalysisError::InvalidParameter(
                "confidence level must lie in (0, 1)".to_string(),
            ));
        }
        let z = quantile_normal((1.0 + level) / 2.0);
        let lower = self
            .points
            .iter()
            .zip(self.variances.iter())
            .map(|(p, v)| p - z * v.sqrt())
            .collect();
        let upper = self
            .points
            .iter()
            .zip(self.variances.iter())
            .map(|(p, v)| p + z * v.sqrt())
            .collect();
        Ok((lower, upper))
    }
}
