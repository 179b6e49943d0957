//! Mathematical utilities: basis functions, penalized least squares, error metrics.

pub mod basis;
pub mod ols;
pub mod stats;

pub use basis::*;
pub use ols::*;
pub use stats::*;
