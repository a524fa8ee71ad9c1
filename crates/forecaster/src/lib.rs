//! # SalesCast Forecaster
//!
//! Turns a product's sales history into a short flat-line forecast.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No knowledge of HTTP or the database. Depends only on `core-types`.
//! - **Stateless Calculation:** `forecast` is a free function over a slice of
//!   records. The same input always yields the same output.
//!
//! ## Public API
//!
//! - `forecast`: Simple exponential smoothing (α = 0.3), projected flat over 5 periods.
//! - `smooth`: The single-pass level computation `forecast` is built on.
//! - `combine_with_history`: Zips a forecast onto the historical records for charting.
//! - `ForecastResult`: The fixed-length forecast.
//! - `ForecastError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod merge;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{FORECAST_HORIZON, ForecastResult, SMOOTHING_FACTOR, forecast, smooth};
pub use error::ForecastError;
pub use merge::combine_with_history;
