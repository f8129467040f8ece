//! # LOBSTER File Ingestion
//!
//! Loads 5-level limit-order-book files in the LOBSTER-style layout used by
//! the slippage analysis: headerless CSV, 20 columns per row, grouped by
//! field: `ask_price_1..5, ask_volume_1..5, bid_price_1..5, bid_volume_1..5`.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::data::orderbook::{OrderBookLevel, OrderBookSnapshot};
use crate::error::{Error, Result};

/// Number of book levels per side in the input files
pub const LOB_LEVELS: usize = 5;

/// Expected column count: price and volume for both sides at each level
pub const LOB_COLUMNS: usize = 4 * LOB_LEVELS;

/// One row of a 5-level LOB file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobRow {
    /// Ask prices, level 1 (best) to 5
    pub ask_price: [f64; LOB_LEVELS],
    /// Ask volumes, level 1 to 5
    pub ask_volume: [f64; LOB_LEVELS],
    /// Bid prices, level 1 (best) to 5
    pub bid_price: [f64; LOB_LEVELS],
    /// Bid volumes, level 1 to 5
    pub bid_volume: [f64; LOB_LEVELS],
}

/// Parsed LOB time series for one instrument
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LobData {
    rows: Vec<LobRow>,
}

impl LobData {
    /// Load a LOB file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != LOB_COLUMNS {
                return Err(Error::InvalidInput(format!(
                    "row {}: expected {} columns, found {}",
                    idx,
                    LOB_COLUMNS,
                    record.len()
                )));
            }

            let mut fields = [0.0f64; LOB_COLUMNS];
            for (col, raw) in record.iter().enumerate() {
                fields[col] = raw.trim().parse::<f64>().map_err(|e| {
                    Error::InvalidInput(format!("row {idx}, column {col}: {e}"))
                })?;
            }

            let mut row = LobRow {
                ask_price: [0.0; LOB_LEVELS],
                ask_volume: [0.0; LOB_LEVELS],
                bid_price: [0.0; LOB_LEVELS],
                bid_volume: [0.0; LOB_LEVELS],
            };
            for level in 0..LOB_LEVELS {
                row.ask_price[level] = fields[level];
                row.ask_volume[level] = fields[LOB_LEVELS + level];
                row.bid_price[level] = fields[2 * LOB_LEVELS + level];
                row.bid_volume[level] = fields[3 * LOB_LEVELS + level];
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Construct directly from parsed rows
    pub fn from_rows(rows: Vec<LobRow>) -> Self {
        Self { rows }
    }

    /// Access the raw rows
    pub fn rows(&self) -> &[LobRow] {
        &self.rows
    }

    /// Number of rows in the file
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the file had no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mid-price from the first row: (best ask + best bid) / 2
    pub fn mid_price(&self) -> Result<f64> {
        let first = self
            .rows
            .first()
            .ok_or_else(|| Error::InvalidInput("empty LOB file".to_string()))?;
        Ok((first.ask_price[0] + first.bid_price[0]) / 2.0)
    }

    /// Build the best-ask-only liquidity sequence: one level per row,
    /// taken from the level-1 ask columns
    ///
    /// This reproduces the analysis's deliberate truncation of the book to
    /// the best ask; deeper books can be constructed by hand and passed to
    /// the estimator directly.
    pub fn best_ask_book(&self) -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            self.rows
                .iter()
                .map(|r| OrderBookLevel::new(r.ask_price[0], r.ask_volume[0]))
                .collect(),
        )
    }
}
