//! Run a full per-ticker analysis against an in-memory data source and
//! print the resulting artifacts.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use skyseries::prelude::*;

/// Deterministic stand-in for the market-data collaborator: a drifting
/// price path quoted on weekdays only.
struct DemoProvider;

impl SeriesProvider for DemoProvider {
    fn fetch_series(&self, _symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries> {
        let base = Utc
            .with_ymd_and_hms(start.year(), start.month(), start.day(), 0, 0, 0)
            .single()
            .ok_or_else(|| AnalysisError::TimestampError("invalid start date".into()))?;
        let total_days = (end - start).num_days().max(0) as usize;

        let mut timestamps: Vec<DateTime<Utc>> = Vec::new();
        let mut values = Vec::new();
        let mut price = 85.0;
        for offset in 0..total_days {
            let ts = base + Duration::days(offset as i64);
            let x = offset as f64;
            price += 0.03 + (x * 0.41).sin() * 0.9 + (x * 1.93).cos() * 0.35;
            if matches!(ts.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            timestamps.push(ts);
            values.push(price);
        }
        TimeSeries::new(timestamps, values)
    }
}

fn describe<T>(name: &str, artifact: &Artifact<T>, detail: impl Fn(&T) -> String) {
    match artifact.value() {
        Some(value) => println!("{name:12} {}", detail(value)),
        None => println!(
            "{name:12} unavailable: {}",
            artifact.error().map(|e| e.to_string()).unwrap_or_default()
        ),
    }
}

fn main() {
    let config = AnalysisConfig::default();
    let bundle = analyze(&DemoProvider, &config, "AIR.NZ");

    println!(
        "== {} ({}) ==",
        bundle.display_name(),
        bundle.symbol()
    );

    describe("series", bundle.series(), |s| {
        format!("{} observations, last close {:.2}", s.len(), s.last_value().unwrap_or(f64::NAN))
    });
    describe("differenced", bundle.differenced(), |d| {
        format!("order {} with {} points", d.order(), d.len())
    });
    describe("acf", bundle.acf(), |c| {
        format!("lag 1 = {:+.3}", c.coefficient(1).unwrap_or(f64::NAN))
    });
    describe("pacf", bundle.pacf(), |c| {
        format!("lag 1 = {:+.3}", c.coefficient(1).unwrap_or(f64::NAN))
    });
    describe("forecast", bundle.forecast(), |f| {
        let (lower, upper) = f
            .interval(0.95)
            .unwrap_or_else(|_| (vec![], vec![]));
        let mut line = String::new();
        if let (Some(&point), Some(&lo), Some(&hi)) =
            (f.points().first(), lower.first(), upper.first())
        {
            line = format!("step 1: {point:.2} [{lo:.2}, {hi:.2}]");
        }
        format!("{} steps, {line}", f.horizon())
    });
}
