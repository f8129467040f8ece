//! # Power-Law Curve Fitting
//!
//! Nonlinear least squares for the market-impact model `g(x) = alpha * x^delta`
//! via Levenberg-Marquardt with the analytic Jacobian. The normal equations
//! are solved with nalgebra.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fitted power-law parameters: slippage(x) ~= alpha * x^delta
///
/// The fit is unconstrained: negative `alpha` or `delta` outside (0, 1)
/// are permitted outcomes on unusual data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    /// Scale parameter
    pub alpha: f64,
    /// Exponent parameter
    pub delta: f64,
}

impl PowerLawFit {
    /// Evaluate the fitted curve at an order size
    pub fn evaluate(&self, x: f64) -> f64 {
        self.alpha * x.powf(self.delta)
    }

    /// Coefficient of determination against observed samples
    pub fn r_squared(&self, sizes: &[f64], slippages: &[f64]) -> f64 {
        let n = slippages.len();
        if n == 0 || sizes.len() != n {
            return 0.0;
        }

        let mean = slippages.iter().sum::<f64>() / n as f64;
        let sst: f64 = slippages.iter().map(|y| (y - mean).powi(2)).sum();
        let ssr: f64 = sizes
            .iter()
            .zip(slippages.iter())
            .map(|(&x, &y)| (y - self.evaluate(x)).powi(2))
            .sum();

        if sst > 0.0 {
            1.0 - ssr / sst
        } else {
            0.0
        }
    }
}

/// Solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Iteration cap, bounds worst-case runtime on degenerate inputs
    pub max_iterations: usize,
    /// Relative improvement in the residual sum of squares below which
    /// the solve is considered converged
    pub tolerance: f64,
    /// Minimum number of valid samples required to attempt a fit
    pub min_samples: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
            min_samples: 3,
        }
    }
}

/// Damping retries per outer iteration before declaring stagnation
const MAX_DAMPING_STEPS: usize = 30;

/// Fit `alpha * x^delta` to parallel (size, slippage) samples
///
/// The caller must filter unfilled samples beforehand; this function
/// rejects NaN inputs rather than skipping them.
///
/// # Errors
///
/// [`Error::FitDivergence`] when fewer than `min_samples` points are
/// supplied or the solver fails to converge. [`Error::InvalidInput`] for
/// mismatched lengths, non-positive sizes, or non-finite values. A failed
/// fit is terminal; there are no internal retries.
pub fn fit_power_law(sizes: &[f64], slippages: &[f64], config: &FitConfig) -> Result<PowerLawFit> {
    validate(sizes, slippages, config)?;

    let (mut alpha, mut delta) = initial_guess(sizes, slippages);
    let mut lambda = 1e-3;
    let mut sse = residual_sse(sizes, slippages, alpha, delta);
    let n = sizes.len();

    for _ in 0..config.max_iterations {
        let mut jacobian = DMatrix::zeros(n, 2);
        let mut residuals = DVector::zeros(n);
        for i in 0..n {
            let x = sizes[i];
            let xd = x.powf(delta);
            residuals[i] = slippages[i] - alpha * xd;
            jacobian[(i, 0)] = xd;
            jacobian[(i, 1)] = alpha * xd * x.ln();
        }

        let jtj = jacobian.transpose() * &jacobian;
        let gradient = jacobian.transpose() * &residuals;

        // stationary point: nothing left to improve
        if gradient.norm() <= 1e-12 * (1.0 + sse) {
            return Ok(PowerLawFit { alpha, delta });
        }

        // inflate damping until a step actually reduces the residual
        let mut stepped = false;
        for _ in 0..MAX_DAMPING_STEPS {
            let mut damped = jtj.clone();
            damped[(0, 0)] += lambda * jtj[(0, 0)].max(1e-12);
            damped[(1, 1)] += lambda * jtj[(1, 1)].max(1e-12);

            let inverse = match damped.try_inverse() {
                Some(inv) => inv,
                None => {
                    lambda *= 10.0;
                    continue;
                }
            };

            let step = &inverse * &gradient;
            let trial_alpha = alpha + step[0];
            let trial_delta = delta + step[1];
            let trial_sse = residual_sse(sizes, slippages, trial_alpha, trial_delta);

            if trial_sse.is_finite() && trial_sse <= sse {
                let improvement = sse - trial_sse;
                alpha = trial_alpha;
                delta = trial_delta;
                sse = trial_sse;
                lambda = (lambda * 0.1).max(1e-12);
                stepped = true;

                if improvement <= config.tolerance * (sse + config.tolerance) {
                    return Ok(PowerLawFit { alpha, delta });
                }
                break;
            }

            lambda *= 10.0;
        }

        if !stepped {
            return Err(Error::FitDivergence(
                "damping exhausted without reducing the residual".to_string(),
            ));
        }
    }

    Err(Error::FitDivergence(format!(
        "no convergence within {} iterations",
        config.max_iterations
    )))
}

fn validate(sizes: &[f64], slippages: &[f64], config: &FitConfig) -> Result<()> {
    if sizes.len() != slippages.len() {
        return Err(Error::InvalidInput(format!(
            "mismatched sample lengths: {} sizes vs {} slippages",
            sizes.len(),
            slippages.len()
        )));
    }
    if sizes.len() < config.min_samples {
        return Err(Error::FitDivergence(format!(
            "need at least {} valid samples, got {}",
            config.min_samples,
            sizes.len()
        )));
    }
    if sizes.iter().any(|x| !x.is_finite() || *x <= 0.0) {
        return Err(Error::InvalidInput(
            "order sizes must be finite and strictly positive".to_string(),
        ));
    }
    if slippages.iter().any(|y| !y.is_finite()) {
        return Err(Error::InvalidInput(
            "slippages must be finite; filter unfilled samples first".to_string(),
        ));
    }
    Ok(())
}

/// Starting point for the solve
///
/// When every slippage is positive the model is log-linear, so an OLS fit
/// of ln(y) on ln(x) gives an exact seed on noise-free data. Otherwise
/// fall back to (1, 1).
fn initial_guess(sizes: &[f64], slippages: &[f64]) -> (f64, f64) {
    if slippages.iter().any(|y| *y <= 0.0) {
        return (1.0, 1.0);
    }

    let n = sizes.len() as f64;
    let lx: Vec<f64> = sizes.iter().map(|x| x.ln()).collect();
    let ly: Vec<f64> = slippages.iter().map(|y| y.ln()).collect();

    let mean_x = lx.iter().sum::<f64>() / n;
    let mean_y = ly.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (x, y) in lx.iter().zip(ly.iter()) {
        covariance += (x - mean_x) * (y - mean_y);
        variance += (x - mean_x) * (x - mean_x);
    }

    if variance > 0.0 {
        let delta = covariance / variance;
        let alpha = (mean_y - delta * mean_x).exp();
        (alpha, delta)
    } else {
        (1.0, 1.0)
    }
}

fn residual_sse(sizes: &[f64], slippages: &[f64], alpha: f64, delta: f64) -> f64 {
    sizes
        .iter()
        .zip(slippages.iter())
        .map(|(&x, &y)| {
            let r = y - alpha * x.powf(delta);
            r * r
        })
        .sum()
}
