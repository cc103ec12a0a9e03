//! Per-symbol analysis requests and their artifact bundles.

use crate::analysis::{acf, difference, pacf, Correlogram, DifferencedSeries};
use crate::core::{ForecastResult, GapPolicy, TimeSeries};
use crate::error::{AnalysisError, Result};
use crate::models::{forecast, ArimaEstimator, ArimaOrder, EstimatorConfig};
use crate::pipeline::provider::SeriesProvider;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Immutable parameters for one analysis request.
///
/// Defaults mirror the dashboard this core serves: four airline tickers,
/// a fixed 2020-2024 window, ARIMA(1,1,1), a 10-step horizon, and
/// correlograms to lag 50.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    symbols: BTreeMap<String, String>,
    start: NaiveDate,
    end: NaiveDate,
    order: ArimaOrder,
    horizon: usize,
    max_lag: usize,
    gap_policy: GapPolicy,
    estimator: EstimatorConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let symbols = [
            ("AIR.NZ", "Air New Zealand"),
            ("UAL", "United Airlines"),
            ("QAN.AX", "Qantas"),
            ("DAL", "Delta"),
        ]
        .into_iter()
        .map(|(ticker, name)| (ticker.to_string(), name.to_string()))
        .collect();

        Self {
            symbols,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid default start date"),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid default end date"),
            order: ArimaOrder::default(),
            horizon: 10,
            max_lag: 50,
            gap_policy: GapPolicy::ForwardFill,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the symbol -> display-name map.
    pub fn with_symbols(mut self, symbols: BTreeMap<String, String>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_order(mut self, order: ArimaOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn with_estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn symbols(&self) -> &BTreeMap<String, String> {
        &self.symbols
    }

    /// Display name for a symbol, falling back to the symbol itself.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.symbols
            .get(symbol)
            .map(String::as_str)
            .unwrap_or(symbol)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }

    pub fn estimator(&self) -> &EstimatorConfig {
        &self.estimator
    }
}

/// One independently-computed output of a request: either the value or
/// the typed failure that made it unavailable.
#[derive(Debug, Clone)]
pub enum Artifact<T> {
    Ready(T),
    Unavailable(AnalysisError),
}

impl<T> Artifact<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Artifact::Ready(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Artifact::Ready(value) => Some(value),
            Artifact::Unavailable(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Artifact::Ready(_) => None,
            Artifact::Unavailable(err) => Some(err),
        }
    }
}

impl<T> From<Result<T>> for Artifact<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Artifact::Ready(value),
            Err(err) => Artifact::Unavailable(err),
        }
    }
}

/// The five artifacts computed for one symbol selection.
///
/// Each is computed from the same fetched snapshot and fails
/// independently; a failed artifact never blocks the others.
#[derive(Debug, Clone)]
pub struct AnalysisBundle {
    symbol: String,
    display_name: String,
    series: Artifact<TimeSeries>,
    differenced: Artifact<DifferencedSeries>,
    acf: Artifact<Correlogram>,
    pacf: Artifact<Correlogram>,
    forecast: Artifact<ForecastResult>,
}

impl AnalysisBundle {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The raw price series as fetched.
    pub fn series(&self) -> &Artifact<TimeSeries> {
        &self.series
    }

    /// The gap-resolved, differenced series.
    pub fn differenced(&self) -> &Artifact<DifferencedSeries> {
        &self.differenced
    }

    /// ACF of the differenced series.
    pub fn acf(&self) -> &Artifact<Correlogram> {
        &self.acf
    }

    /// PACF of the differenced series.
    pub fn pacf(&self) -> &Artifact<Correlogram> {
        &self.pacf
    }

    /// Fitted-model forecast on the price scale.
    pub fn forecast(&self) -> &Artifact<ForecastResult> {
        &self.forecast
    }
}

/// Run one full analysis request for `symbol`.
///
/// The series is fetched exactly once and shared across every
/// computation, so all five artifacts describe an identical snapshot.
/// An upstream failure marks all of them unavailable with that error;
/// otherwise each artifact carries its own outcome.
pub fn analyze(
    provider: &dyn SeriesProvider,
    config: &AnalysisConfig,
    symbol: &str,
) -> AnalysisBundle {
    let display_name = config.display_name(symbol).to_string();

    let fetched = provider
        .fetch_series(symbol, config.start(), config.end())
        .and_then(|series| {
            if series.is_empty() {
                Err(AnalysisError::EmptyResult {
                    symbol: symbol.to_string(),
                })
            } else {
                Ok(series)
            }
        });

    let raw = match fetched {
        Ok(series) => series,
        Err(err) => {
            return AnalysisBundle {
                symbol: symbol.to_string(),
                display_name,
                series: Artifact::Unavailable(err.clone()),
                differenced: Artifact::Unavailable(err.clone()),
                acf: Artifact::Unavailable(err.clone()),
                pacf: Artifact::Unavailable(err.clone()),
                forecast: Artifact::Unavailable(err),
            };
        }
    };

    // One gap resolution, shared by everything downstream.
    let prepared = raw.regularized(config.gap_policy());

    let differenced = prepared
        .clone()
        .and_then(|series| difference(&series, config.order().d));

    let acf_artifact = differenced
        .as_ref()
        .map_err(|err| err.clone())
        .and_then(|diffed| acf(diffed.series(), config.max_lag()));

    let pacf_artifact = differenced
        .as_ref()
        .map_err(|err| err.clone())
        .and_then(|diffed| pacf(diffed.series(), config.max_lag()));

    let forecast_artifact = prepared.and_then(|series| {
        let estimator = ArimaEstimator::with_config(config.estimator().clone());
        let model = estimator.fit(&series, config.order())?;
        forecast(&model, config.horizon())
    });

    AnalysisBundle {
        symbol: symbol.to_string(),
        display_name,
        series: Artifact::Ready(raw),
        differenced: differenced.into(),
        acf: acf_artifact.into(),
        pacf: pacf_artifact.into(),
        forecast: forecast_artifact.into(),
    }
}
