//! # Fit Module
//!
//! Power-law curve fitting for market-impact samples.

pub mod power_law;

pub use power_law::{fit_power_law, FitConfig, PowerLawFit};
