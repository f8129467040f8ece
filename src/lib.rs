//! # Market-Impact Curve Estimation
//!
//! This library estimates market-impact (slippage) curves from limit-order-book
//! snapshots: for a given order size it computes the expected execution cost
//! relative to mid-price by walking the resting ask-side liquidity, then fits
//! a power-law model `g(x) = alpha * x^delta` to the (size, slippage) samples
//! per instrument.
//!
//! ## Modules
//!
//! - `data` - Order book snapshot types and LOBSTER-style CSV ingestion
//! - `impact` - Slippage estimation and order-size sweeps
//! - `fit` - Power-law nonlinear least squares
//! - `analysis` - Per-instrument pipeline and curve export
//! - `error` - Error types
//!
//! ## Example
//!
//! ```rust
//! use market_impact::prelude::*;
//!
//! let book = OrderBookSnapshot::from_pairs(&[(100.05, 50.0), (100.10, 100.0)]);
//! let mid_price = 100.0;
//!
//! // 50 @ 100.05 + 70 @ 100.10 for a 120-share order
//! let fill = estimate_slippage(&book, 120.0, mid_price);
//! assert!(fill.is_filled());
//!
//! // not enough depth for 200 shares
//! let fill = estimate_slippage(&book, 200.0, mid_price);
//! assert_eq!(fill, Fill::Unfilled);
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod fit;
pub mod impact;

// Re-export commonly used types
pub use analysis::{ImpactAnalyzer, ImpactCurve};
pub use data::lobster::LobData;
pub use data::orderbook::{OrderBookLevel, OrderBookSnapshot};
pub use error::{Error, Result};
pub use fit::power_law::{fit_power_law, FitConfig, PowerLawFit};
pub use impact::slippage::{estimate_slippage, sweep, Fill, SizeGrid, SlippageSample};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tickers analyzed by the CLI driver
pub const DEFAULT_TICKERS: &[&str] = &["AMZN", "MSFT", "GOOG"];

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{write_curve_csv, write_curve_json, ImpactAnalyzer, ImpactCurve};
    pub use crate::data::lobster::{LobData, LobRow};
    pub use crate::data::orderbook::{OrderBookLevel, OrderBookSnapshot};
    pub use crate::error::{Error, Result};
    pub use crate::fit::power_law::{fit_power_law, FitConfig, PowerLawFit};
    pub use crate::impact::slippage::{estimate_slippage, sweep, Fill, SizeGrid, SlippageSample};
}
