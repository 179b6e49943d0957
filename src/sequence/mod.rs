//! Sequence-model building blocks for the offline backtest.
//!
//! - min-max scaling (`scaler`)
//! - sliding windows (`window`)
//! - linear autoregression over a window (`autoregressive`)

pub mod autoregressive;
pub mod scaler;
pub mod window;

pub use autoregressive::*;
pub use scaler::*;
pub use window::*;
