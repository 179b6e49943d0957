//! Input/output helpers.
//!
//! - request ingest + series normalization (`ingest`)
//! - forecast/backtest exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
