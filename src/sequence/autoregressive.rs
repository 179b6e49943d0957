//! Linear autoregression over a sliding window.
//!
//! `ŷ = c + Σ_k w_k · x_k`, fit by lightly penalized least squares so that
//! collinear windows (flat stretches are common in minute bars) stay solvable.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::solve_penalized;
use crate::sequence::window::Windows;

/// Ridge λ applied to window weights (never to the intercept).
pub const DEFAULT_PENALTY: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRegressor {
    intercept: f64,
    weights: Vec<f64>,
}

impl WindowRegressor {
    pub fn fit(windows: &Windows, penalty: f64) -> Result<Self, AppError> {
        let Some(first) = windows.inputs.first() else {
            return Err(AppError::validation("No training windows to fit."));
        };
        let lookback = first.len();
        if windows.inputs.iter().any(|w| w.len() != lookback) {
            return Err(AppError::internal("Training windows have inconsistent lengths."));
        }

        let n = windows.len();
        let p = lookback + 1;
        let x = DMatrix::from_fn(n, p, |i, j| if j == 0 { 1.0 } else { windows.inputs[i][j - 1] });
        let y = DVector::from_row_slice(&windows.targets);

        let mut penalties = vec![penalty; p];
        penalties[0] = 0.0;

        let beta = solve_penalized(&x, &y, &penalties)
            .ok_or_else(|| AppError::internal("Autoregression solve failed."))?;

        Ok(Self {
            intercept: beta[0],
            weights: beta.rows(1, lookback).iter().copied().collect(),
        })
    }

    pub fn lookback(&self) -> usize {
        self.weights.len()
    }

    /// Predict the value following `window`.
    ///
    /// # Panics
    /// Panics if `window.len() != self.lookback()`.
    pub fn predict(&self, window: &[f64]) -> f64 {
        assert_eq!(window.len(), self.weights.len(), "window length must match lookback");
        self.intercept + window.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>()
    }
}
