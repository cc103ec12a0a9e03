//! TimeSeries data structure for representing an observed price series.

use crate::error::{AnalysisError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Policy for resolving gaps before differencing or model fitting.
///
/// A gap is either a missing calendar step (e.g. a non-trading day) or a
/// non-finite observation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// Regularize onto the nominal-frequency grid, propagating the last
    /// valid observation into each gap. Preserves calendar coverage.
    ForwardFill,
    /// Remove observations with missing values, shortening the series.
    Drop,
}

/// An immutable univariate time series: strictly increasing timestamps,
/// one scalar observation per timestamp, and an optional nominal frequency.
///
/// Constructed once by the upstream data collaborator; downstream
/// components consume it and never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Duration>,
}

/// Builder for constructing a [`TimeSeries`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Duration>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn frequency(mut self, frequency: Duration) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        TimeSeries::with_frequency(self.timestamps, self.values, self.frequency)
    }
}

impl TimeSeries {
    /// Create a series from timestamps and values.
    ///
    /// Timestamps must be strictly increasing; duplicates are rejected.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::with_frequency(timestamps, values, None)
    }

    /// Create a series with an explicit nominal frequency.
    pub fn with_frequency(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        frequency: Option<Duration>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "timestamp count {} does not match value count {}",
                timestamps.len(),
                values.len()
            )));
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(AnalysisError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        if let Some(freq) = frequency {
            if freq <= Duration::zero() {
                return Err(AnalysisError::InvalidParameter(
                    "frequency must be positive".to_string(),
                ));
            }
        }
        Ok(Self {
            timestamps,
            values,
            frequency,
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Observation timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Observation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Nominal frequency, when known.
    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    /// Timestamp of the last observation.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Value of the last observation.
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Extract `[start, end)` as a new series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end || end > self.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "invalid slice bounds {}..{} for series of length {}",
                start,
                end,
                self.len()
            )));
        }
        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            frequency: self.frequency,
        })
    }

    /// Whether any observation value is NaN or infinite.
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Infer the nominal frequency as the modal spacing between
    /// consecutive timestamps.
    ///
    /// Fails unless the modal spacing accounts for at least `tolerance`
    /// (a ratio in 0..=1) of all spacings.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for pair in self.timestamps.windows(2) {
            *counts.entry((pair[1] - pair[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal, modal_count) = counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&spacing, &count)| (spacing, count))
            .ok_or_else(|| {
                AnalysisError::FrequencyInference("empty spacing data".to_string())
            })?;

        let total: usize = counts.values().sum();
        if (modal_count as f64) < tolerance * total as f64 {
            return Err(AnalysisError::FrequencyInference(
                "no dominant modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal))
    }

    /// Resolve gaps according to `policy`, returning a new series.
    ///
    /// `ForwardFill` places the series on the nominal-frequency grid from
    /// the first valid observation to the last timestamp, carrying the
    /// last valid value through calendar gaps and missing observations;
    /// the result has its frequency set. `Drop` removes missing
    /// observations and leaves the calendar untouched.
    pub fn regularized(&self, policy: GapPolicy) -> Result<TimeSeries> {
        match policy {
            GapPolicy::Drop => {
                let kept: Vec<(DateTime<Utc>, f64)> = self
                    .timestamps
                    .iter()
                    .zip(self.values.iter())
                    .filter(|(_, v)| v.is_finite())
                    .map(|(t, v)| (*t, *v))
                    .collect();
                let (timestamps, values) = kept.into_iter().unzip();
                TimeSeries::with_frequency(timestamps, values, self.frequency)
            }
            GapPolicy::ForwardFill => {
                let freq = match self.frequency {
                    Some(f) => f,
                    None => self.infer_frequency(0.5)?,
                };
                let last = self.last_timestamp().ok_or(AnalysisError::InsufficientData {
                    needed: 1,
                    got: 0,
                })?;

                let mut timestamps = Vec::new();
                let mut values = Vec::new();
                let mut cursor = 0usize;
                let mut carried: Option<f64> = None;
                let mut grid = self.timestamps[0];

                while grid <= last {
                    while cursor < self.len() && self.timestamps[cursor] <= grid {
                        if self.values[cursor].is_finite() {
                            carried = Some(self.values[cursor]);
                        }
                        cursor += 1;
                    }
                    // Grid points before the first valid observation are skipped.
                    if let Some(value) = carried {
                        timestamps.push(grid);
                        values.push(value);
                    }
                    grid += freq;
                }

                TimeSeries::with_frequency(timestamps, values, Some(freq))
            }
        }
    }
}
