//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the wire types of the forecast service (`ForecastRequest`, `ForecastResponse`)
//! - the normalized series (`Series`, `SeriesPoint`)
//! - sampling frequencies (`Frequency`)
//! - forecaster tunables (`ForecasterConfig`)

pub mod frequency;
pub mod types;

pub use frequency::*;
pub use types::*;
