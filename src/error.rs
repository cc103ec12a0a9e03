//! Error types for the skyseries analysis core.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while preparing, diagnosing, fitting, or
/// forecasting a price series.
///
/// Errors are `Clone` so a single upstream failure can be replicated into
/// every artifact that depended on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Series too short for the requested lag or model order.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Singular or constant series breaking a recursion or regression.
    #[error("degenerate series: {0}")]
    DegenerateSeries(String),

    /// Iterative estimation exhausted its iteration cap.
    #[error("estimation did not converge within {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Fitted AR polynomial has a root on or inside the unit circle.
    #[error("fitted model is non-stationary")]
    NonStationaryModel,

    /// Fitted MA polynomial has a root on or inside the unit circle.
    #[error("fitted model is non-invertible")]
    NonInvertibleModel,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Missing values present where a gap policy should have resolved them.
    #[error("missing values detected in data")]
    MissingValues,

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Upstream data fetch failed; propagated, never generated locally.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Upstream fetch returned no observations for the symbol and range.
    #[error("no data returned for symbol {symbol}")]
    EmptyResult { symbol: String },
}
