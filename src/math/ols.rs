//! Least squares solvers.
//!
//! Every model in this crate is linear in its coefficients once the design
//! matrix is built, so fitting reduces to:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2 + Σ_j λ_j β_j^2
//! ```
//!
//! Implementation choices:
//! - Penalties are applied by appending `sqrt(λ_j) · e_j` rows with a zero
//!   target, which turns the ridge problem into a plain (taller) OLS problem.
//! - We solve with SVD so tall and rank-deficient systems are handled
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve a ridge-penalized least squares problem.
///
/// `penalties[j]` is the λ applied to coefficient `j`; zero leaves the
/// coefficient unpenalized.
///
/// # Panics
/// Panics if `penalties.len() != x.ncols()`.
pub fn solve_penalized(x: &DMatrix<f64>, y: &DVector<f64>, penalties: &[f64]) -> Option<DVector<f64>> {
    assert_eq!(penalties.len(), x.ncols(), "one penalty per column");

    let penalized: Vec<(usize, f64)> = penalties
        .iter()
        .enumerate()
        .filter(|&(_, &lambda)| lambda > 0.0)
        .map(|(j, &lambda)| (j, lambda.sqrt()))
        .collect();

    if penalized.is_empty() {
        return solve_least_squares(x, y);
    }

    let n = x.nrows();
    let p = x.ncols();
    let mut aug = DMatrix::<f64>::zeros(n + penalized.len(), p);
    aug.view_mut((0, 0), (n, p)).copy_from(x);
    for (row, &(j, weight)) in penalized.iter().enumerate() {
        aug[(n + row, j)] = weight;
    }

    let mut target = DVector::<f64>::zeros(n + penalized.len());
    target.rows_mut(0, n).copy_from(y);

    solve_least_squares(&aug, &target)
}
