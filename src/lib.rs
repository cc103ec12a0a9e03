//! # skyseries
//!
//! Univariate ARIMA analysis core for equity price series.
//!
//! Turns a raw price series into a stationarity-inducing differenced
//! series, ACF/PACF correlograms, a fitted ARIMA(p, d, q) model, and
//! multi-step forecasts with growing error variance. A small
//! orchestration layer computes all five per-ticker artifacts from a
//! single fetched snapshot, degrading each one independently on failure.
//!
//! Data retrieval and rendering are external collaborators: retrieval is
//! modeled by the [`pipeline::SeriesProvider`] trait, and every component
//! returns a plain value object for a rendering layer to consume.

#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use error::{AnalysisError, Result};

pub mod prelude {
    pub use crate::analysis::{acf, difference, pacf, Correlogram, DifferencedSeries};
    pub use crate::core::{ForecastResult, GapPolicy, TimeSeries, TimeSeriesBuilder};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::models::{forecast, ArimaEstimator, ArimaModel, ArimaOrder, EstimatorConfig};
    pub use crate::pipeline::{analyze, AnalysisBundle, AnalysisConfig, Artifact, SeriesProvider};
}
