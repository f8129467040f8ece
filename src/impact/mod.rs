//! # Impact Module
//!
//! Slippage estimation over order book snapshots.

pub mod slippage;

pub use slippage::{estimate_slippage, sweep, Fill, SizeGrid, SlippageSample};
