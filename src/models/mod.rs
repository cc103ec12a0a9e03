//! ARIMA model estimation and forecasting.

mod arima;
mod forecaster;
mod stability;

pub use arima::{ArimaEstimator, ArimaModel, ArimaOrder, EstimatorConfig};
pub use forecaster::forecast;
pub use stability::{is_invertible, is_stationary};
