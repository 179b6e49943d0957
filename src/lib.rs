//! `stock-forecast` library crate.
//!
//! The binary (`sf`) is a thin wrapper around this library so the forecast
//! pipeline, the HTTP router, and the backtest can be tested in-process.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod sequence;
pub mod server;
