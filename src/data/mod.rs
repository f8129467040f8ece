//! # Data Module
//!
//! Order book data structures and LOB file ingestion.
//!
//! ## Modules
//!
//! - `orderbook` - Ask-side order book snapshot types
//! - `lobster` - LOBSTER-style 5-level CSV loading

pub mod lobster;
pub mod orderbook;

pub use lobster::{LobData, LobRow};
pub use orderbook::{OrderBookLevel, OrderBookSnapshot};
