//! # Per-Instrument Impact Analysis
//!
//! Orchestrates the full pipeline for one instrument: sweep the estimator
//! over a size grid, drop unfilled samples, fit the power law, and package
//! the result for reporting.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::Writer;
use serde::Serialize;

use crate::data::lobster::LobData;
use crate::data::orderbook::OrderBookSnapshot;
use crate::error::Result;
use crate::fit::power_law::{fit_power_law, FitConfig, PowerLawFit};
use crate::impact::slippage::{sweep, SizeGrid, SlippageSample};

/// Per-instrument analysis pipeline
#[derive(Debug, Clone, Default)]
pub struct ImpactAnalyzer {
    /// Order-size sweep configuration
    pub grid: SizeGrid,
    /// Curve-fit configuration
    pub fit: FitConfig,
}

/// Fitted impact curve for one instrument
#[derive(Debug, Clone, Serialize)]
pub struct ImpactCurve {
    /// Instrument identifier
    pub ticker: String,
    /// Fitted power-law parameters
    pub fit: PowerLawFit,
    /// Goodness of fit against the valid samples
    pub r_squared: f64,
    /// Number of samples that filled and entered the fit
    pub n_valid: usize,
    /// Full sweep, including unfilled sizes
    pub samples: Vec<SlippageSample>,
    /// When the analysis ran
    pub generated_at: DateTime<Utc>,
}

impl ImpactAnalyzer {
    /// Create an analyzer with explicit grid and fit settings
    pub fn new(grid: SizeGrid, fit: FitConfig) -> Self {
        Self { grid, fit }
    }

    /// Analyze a loaded LOB file, using the best-ask book and the
    /// first-row mid-price
    pub fn analyze(&self, ticker: &str, lob: &LobData) -> Result<ImpactCurve> {
        let book = lob.best_ask_book();
        let mid_price = lob.mid_price()?;
        self.analyze_book(ticker, &book, mid_price)
    }

    /// Analyze an already-constructed book snapshot
    ///
    /// Unfilled sweep points are dropped before fitting; the fit fails
    /// when fewer than `fit.min_samples` points remain, and the caller
    /// decides whether to skip the instrument.
    pub fn analyze_book(
        &self,
        ticker: &str,
        book: &OrderBookSnapshot,
        mid_price: f64,
    ) -> Result<ImpactCurve> {
        let samples = sweep(book, mid_price, &self.grid);

        let mut sizes = Vec::with_capacity(samples.len());
        let mut slippages = Vec::with_capacity(samples.len());
        for sample in &samples {
            if let Some(slippage) = sample.fill.value() {
                sizes.push(sample.order_size);
                slippages.push(slippage);
            }
        }

        let fit = fit_power_law(&sizes, &slippages, &self.fit)?;
        let r_squared = fit.r_squared(&sizes, &slippages);

        Ok(ImpactCurve {
            ticker: ticker.to_string(),
            fit,
            r_squared,
            n_valid: sizes.len(),
            samples,
            generated_at: Utc::now(),
        })
    }
}

/// Write the empirical and fitted curves as CSV: one row per sweep size
/// with columns `order_size, slippage, fitted`; `slippage` is empty where
/// the order did not fill
pub fn write_curve_csv<P: AsRef<Path>>(curve: &ImpactCurve, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["order_size", "slippage", "fitted"])?;
    for sample in &curve.samples {
        let empirical = sample
            .fill
            .value()
            .map(|s| format!("{s:.10}"))
            .unwrap_or_default();
        writer.write_record([
            format!("{}", sample.order_size),
            empirical,
            format!("{:.10}", curve.fit.evaluate(sample.order_size)),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Serialize a curve (parameters, diagnostics, and samples) as pretty JSON
pub fn write_curve_json<P: AsRef<Path>>(curve: &ImpactCurve, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, curve)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::orderbook::OrderBookSnapshot;
    use crate::error::Error;
    use tempfile::tempdir;

    /// Deep book: every default grid size up to 450 fills
    fn deep_book() -> OrderBookSnapshot {
        OrderBookSnapshot::from_pairs(&[
            (100.05, 100.0),
            (100.10, 100.0),
            (100.20, 100.0),
            (100.40, 150.0),
        ])
    }

    #[test]
    fn test_analyze_book_full_grid() {
        let analyzer = ImpactAnalyzer::default();
        let curve = analyzer.analyze_book("TEST", &deep_book(), 100.0).unwrap();

        assert_eq!(curve.ticker, "TEST");
        assert_eq!(curve.samples.len(), 29);
        assert_eq!(curve.n_valid, 29);
        assert!(curve.fit.alpha.is_finite());
        assert!(curve.fit.delta.is_finite());
        assert!(curve.r_squared <= 1.0);
    }

    #[test]
    fn test_analyze_book_drops_unfilled_tail() {
        // total volume 150: grid sizes 160..290 do not fill
        let shallow = OrderBookSnapshot::from_pairs(&[(100.05, 50.0), (100.10, 100.0)]);
        let analyzer = ImpactAnalyzer::default();
        let curve = analyzer.analyze_book("TEST", &shallow, 100.0).unwrap();

        assert_eq!(curve.samples.len(), 29);
        assert_eq!(curve.n_valid, 15);
        assert_eq!(
            curve.samples.iter().filter(|s| s.fill.is_filled()).count(),
            15
        );
    }

    #[test]
    fn test_analyze_book_too_shallow_to_fit() {
        // only size 10 fills: 1 valid sample < 3
        let tiny = OrderBookSnapshot::from_pairs(&[(100.05, 15.0)]);
        let analyzer = ImpactAnalyzer::default();
        let err = analyzer.analyze_book("TEST", &tiny, 100.0).unwrap_err();
        assert!(err.is_fit_divergence());
    }

    #[test]
    fn test_analyze_empty_lob_fails() {
        let analyzer = ImpactAnalyzer::default();
        let err = analyzer.analyze("TEST", &LobData::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_write_curve_json() {
        let analyzer = ImpactAnalyzer::default();
        let curve = analyzer.analyze_book("TEST", &deep_book(), 100.0).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("TEST_slippage_fit.json");
        write_curve_json(&curve, &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["ticker"], "TEST");
        assert_eq!(parsed["samples"].as_array().unwrap().len(), 29);
    }

    #[test]
    fn test_write_curve_csv() {
        let analyzer = ImpactAnalyzer::default();
        let curve = analyzer.analyze_book("TEST", &deep_book(), 100.0).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("TEST_slippage_fit.csv");
        write_curve_csv(&curve, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "order_size,slippage,fitted");
        assert_eq!(lines.count(), 29);
    }
}
