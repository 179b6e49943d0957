//! Market-data providers.

pub mod alphavantage;

pub use alphavantage::*;
