//! Forecast fitting orchestration.
//!
//! Responsibilities:
//!
//! - infer the sampling frequency of a series
//! - configure the decomposition model for that frequency
//! - fit it (penalized least squares)
//! - forecast future timestamps with simulated confidence intervals
//! - score the validation prefix

pub mod configure;
pub mod fitter;
pub mod frequency;
pub mod uncertainty;
pub mod validation;

pub use configure::*;
pub use fitter::*;
pub use frequency::*;
pub use uncertainty::*;
pub use validation::*;
