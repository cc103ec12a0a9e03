//! Core data structures shared by all analysis components.

mod forecast;
mod time_series;

pub use forecast::ForecastResult;
pub use time_series::{GapPolicy, TimeSeries, TimeSeriesBuilder};
