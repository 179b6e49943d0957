//! Decomposition model: configuration, seasonal components, fitted predictor.
//!
//! Models are plain data plus small pure functions so the fitting code can stay
//! generic over the configured components.

pub mod model;
pub mod seasonality;

pub use model::*;
pub use seasonality::*;
