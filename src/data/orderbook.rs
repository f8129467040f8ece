//! # Order Book Data Structures
//!
//! Ask-side snapshot types consumed by the slippage estimator.

use serde::{Deserialize, Serialize};

/// A single resting quote in the order book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Price at this level
    pub price: f64,
    /// Resting volume at this level (shares/contracts)
    pub volume: f64,
}

impl OrderBookLevel {
    /// Create a new order book level
    pub fn new(price: f64, volume: f64) -> Self {
        Self { price, volume }
    }

    /// Get the notional value at this level
    pub fn notional(&self) -> f64 {
        self.price * self.volume
    }
}

/// Ask-side order book snapshot at a single point in time
///
/// Levels are expected pre-sorted best-to-worst (ascending price).
/// The snapshot is read-only input to the estimator; nothing in this
/// crate mutates it after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    levels: Vec<OrderBookLevel>,
}

impl OrderBookSnapshot {
    /// Create a snapshot from a sequence of ask levels
    pub fn new(levels: Vec<OrderBookLevel>) -> Self {
        Self { levels }
    }

    /// Create a snapshot from (price, volume) pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            levels: pairs
                .iter()
                .map(|&(price, volume)| OrderBookLevel::new(price, volume))
                .collect(),
        }
    }

    /// Get the levels in best-to-worst order
    pub fn levels(&self) -> &[OrderBookLevel] {
        &self.levels
    }

    /// Get the best (lowest) ask level
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.levels.first()
    }

    /// Total resting volume across all levels
    pub fn total_volume(&self) -> f64 {
        self.levels.iter().map(|l| l.volume).sum()
    }

    /// Total notional value across all levels
    pub fn total_notional(&self) -> f64 {
        self.levels.iter().map(|l| l.notional()).sum()
    }

    /// Number of levels in the snapshot
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the snapshot has no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Check that prices are in ascending (best-to-worst ask) order
    pub fn is_sorted(&self) -> bool {
        self.levels.windows(2).all(|w| w[0].price <= w[1].price)
    }
}
