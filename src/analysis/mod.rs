//! Series transforms and autocorrelation diagnostics.

mod correlogram;
mod diff;

pub use correlogram::{acf, pacf, Correlogram};
pub use diff::{difference, integrate, DifferencedSeries};
