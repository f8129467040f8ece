//! # Slippage Estimation
//!
//! Walks resting ask-side liquidity to compute the expected execution cost
//! of a marketable buy order relative to mid-price.

use serde::{Deserialize, Serialize};

use crate::data::orderbook::OrderBookSnapshot;

/// Outcome of filling an order against a book snapshot
///
/// Replaces a NaN sentinel with an explicit tag so that "could not fill"
/// can never be mistaken for zero slippage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    /// Volume-weighted average fill price minus mid-price.
    /// Positive = adverse (paid above mid).
    Filled(f64),
    /// The book's total volume was less than the order size
    Unfilled,
}

impl Fill {
    /// Get the slippage value, if the order filled
    pub fn value(&self) -> Option<f64> {
        match self {
            Fill::Filled(s) => Some(*s),
            Fill::Unfilled => None,
        }
    }

    /// Whether the order filled completely
    pub fn is_filled(&self) -> bool {
        matches!(self, Fill::Filled(_))
    }
}

/// One point of a slippage sweep: order size and its fill outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippageSample {
    /// Simulated order size
    pub order_size: f64,
    /// Fill outcome at this size
    pub fill: Fill,
}

/// Estimate slippage for a buy order of `order_size` against `book`
///
/// Greedily consumes volume from the best level upward. If the book's
/// total volume is insufficient, returns [`Fill::Unfilled`]; this is an
/// expected outcome for large sizes, not an error.
///
/// `order_size` must be positive. The book is only read, so the same
/// snapshot can be swept across many sizes.
pub fn estimate_slippage(book: &OrderBookSnapshot, order_size: f64, mid_price: f64) -> Fill {
    let mut remaining = order_size;
    let mut total_cost = 0.0;

    for level in book.levels() {
        let fill = remaining.min(level.volume);
        total_cost += fill * level.price;
        remaining -= fill;

        if remaining <= 0.0 {
            break;
        }
    }

    if remaining > 0.0 {
        return Fill::Unfilled;
    }

    let avg_price = total_cost / order_size;
    Fill::Filled(avg_price - mid_price)
}

/// Order-size grid for sweeping the estimator
///
/// Generates `start, start + step, ...` strictly below `stop`, matching
/// a half-open range. The default sweep is sizes 10 through 290 in steps
/// of 10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeGrid {
    /// First order size (inclusive)
    pub start: f64,
    /// End of the range (exclusive)
    pub stop: f64,
    /// Increment between sizes
    pub step: f64,
}

impl Default for SizeGrid {
    fn default() -> Self {
        Self {
            start: 10.0,
            stop: 300.0,
            step: 10.0,
        }
    }
}

impl SizeGrid {
    /// Create a new grid
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Materialize the grid as a vector of order sizes
    pub fn sizes(&self) -> Vec<f64> {
        let mut sizes = Vec::new();
        if self.step <= 0.0 {
            return sizes;
        }
        // index-based stepping avoids accumulating float error
        let mut i = 0u32;
        loop {
            let size = self.start + self.step * f64::from(i);
            if size >= self.stop {
                break;
            }
            sizes.push(size);
            i += 1;
        }
        sizes
    }
}

/// Sweep the estimator over a size grid against one snapshot
pub fn sweep(book: &OrderBookSnapshot, mid_price: f64, grid: &SizeGrid) -> Vec<SlippageSample> {
    grid.sizes()
        .into_iter()
        .map(|order_size| SlippageSample {
            order_size,
            fill: estimate_slippage(book, order_size, mid_price),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::orderbook::OrderBookSnapshot;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_book() -> OrderBookSnapshot {
        OrderBookSnapshot::from_pairs(&[(100.05, 50.0), (100.10, 100.0)])
    }

    /// Reference implementation: expand every level into quanta of 0.25
    /// volume and consume them one by one.
    fn brute_force(book: &OrderBookSnapshot, order_size: f64, mid_price: f64) -> Fill {
        const QUANTUM: f64 = 0.25;
        let mut remaining = (order_size / QUANTUM).round() as i64;
        let mut total_cost = 0.0;

        for level in book.levels() {
            let quanta = (level.volume / QUANTUM).round() as i64;
            for _ in 0..quanta {
                if remaining == 0 {
                    break;
                }
                total_cost += QUANTUM * level.price;
                remaining -= 1;
            }
        }

        if remaining > 0 {
            Fill::Unfilled
        } else {
            Fill::Filled(total_cost / order_size - mid_price)
        }
    }

    #[test]
    fn test_two_level_fill() {
        // fill 50 @ 100.05 + 70 @ 100.10
        let fill = estimate_slippage(&sample_book(), 120.0, 100.0);
        let slippage = fill.value().unwrap();
        let expected = (50.0 * 100.05 + 70.0 * 100.10) / 120.0 - 100.0;
        assert!((slippage - expected).abs() < 1e-12);
        // (50*100.05 + 70*100.10)/120 = 100.0791666..., so 0.0791667 over mid
        assert!((slippage - 0.0791666667).abs() < 1e-6);
    }

    #[test]
    fn test_insufficient_depth() {
        // total available = 150 < 200
        let fill = estimate_slippage(&sample_book(), 200.0, 100.0);
        assert_eq!(fill, Fill::Unfilled);
        assert!(fill.value().is_none());
    }

    #[test]
    fn test_exact_fill_boundary() {
        // order size exactly equal to total volume is a valid fill
        let fill = estimate_slippage(&sample_book(), 150.0, 100.0);
        let expected = (50.0 * 100.05 + 100.0 * 100.10) / 150.0 - 100.0;
        assert!((fill.value().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_level_fill() {
        // satisfied entirely at the best level
        let fill = estimate_slippage(&sample_book(), 30.0, 100.0);
        assert!((fill.value().unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volume_level_skipped() {
        let book =
            OrderBookSnapshot::from_pairs(&[(100.0, 0.0), (100.5, 10.0), (101.0, 10.0)]);
        let fill = estimate_slippage(&book, 10.0, 100.0);
        assert!((fill.value().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBookSnapshot::default();
        assert_eq!(estimate_slippage(&book, 1.0, 100.0), Fill::Unfilled);
    }

    #[test]
    fn test_idempotent_over_repeated_calls() {
        let book = sample_book();
        let before = book.clone();
        let first = estimate_slippage(&book, 120.0, 100.0);
        for _ in 0..10 {
            assert_eq!(estimate_slippage(&book, 120.0, 100.0), first);
        }
        assert_eq!(book, before);
    }

    #[test]
    fn test_monotone_in_order_size() {
        let book = OrderBookSnapshot::from_pairs(&[
            (100.1, 40.0),
            (100.2, 60.0),
            (100.4, 80.0),
            (100.9, 120.0),
        ]);
        let mid = 100.0;

        let mut prev = f64::NEG_INFINITY;
        let mut size = 5.0;
        while size <= book.total_volume() {
            let slippage = estimate_slippage(&book, size, mid).value().unwrap();
            assert!(
                slippage >= prev - 1e-12,
                "slippage decreased at size {size}: {slippage} < {prev}"
            );
            prev = slippage;
            size += 5.0;
        }
    }

    #[test]
    fn test_matches_brute_force_on_random_books() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let n_levels = rng.gen_range(1..=8);
            let mut price = 100.0;
            let mut pairs = Vec::with_capacity(n_levels);
            for _ in 0..n_levels {
                price += rng.gen_range(1..=20) as f64 * 0.01;
                let volume = rng.gen_range(0..=40) as f64 * 0.25;
                pairs.push((price, volume));
            }
            let book = OrderBookSnapshot::from_pairs(&pairs);
            let mid = 100.0;
            let order_size = rng.gen_range(1..=60) as f64 * 0.25;

            let fast = estimate_slippage(&book, order_size, mid);
            let slow = brute_force(&book, order_size, mid);

            match (fast, slow) {
                (Fill::Filled(a), Fill::Filled(b)) => {
                    assert!((a - b).abs() < 1e-9, "mismatch: {a} vs {b}")
                }
                (Fill::Unfilled, Fill::Unfilled) => {}
                other => panic!("fill outcome mismatch: {other:?}"),
            }
        }
    }

    #[test]
    fn test_size_grid_default() {
        let sizes = SizeGrid::default().sizes();
        assert_eq!(sizes.len(), 29);
        assert!((sizes[0] - 10.0).abs() < 1e-12);
        assert!((sizes[28] - 290.0).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_marks_unfilled_tail() {
        let samples = sweep(&sample_book(), 100.0, &SizeGrid::default());
        assert_eq!(samples.len(), 29);
        for s in &samples {
            if s.order_size <= 150.0 {
                assert!(s.fill.is_filled(), "size {} should fill", s.order_size);
            } else {
                assert_eq!(s.fill, Fill::Unfilled, "size {} should not fill", s.order_size);
            }
        }
    }
}
