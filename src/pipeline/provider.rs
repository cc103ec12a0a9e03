//! Upstream data interface.

use crate::core::TimeSeries;
use crate::error::Result;
use chrono::NaiveDate;

/// Source of raw price series; the one external collaborator of the
/// analysis core.
///
/// Implementations fetch an adjusted-close or close-price series for a
/// symbol over a date range. Failures surface as
/// [`NetworkError`](crate::AnalysisError::NetworkError) or
/// [`EmptyResult`](crate::AnalysisError::EmptyResult) and must not crash
/// downstream computation.
pub trait SeriesProvider {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries>;
}
