//! Shared domain types for SalesCast.
//!
//! Everything here is plain data: the records the forecaster consumes, the
//! chart points the web layer returns, and the user account shapes the
//! database and auth layers pass around.

pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{
    ChartPoint, DEFAULT_ROLE, DEFAULT_STATUS, NewUser, RESERVED_FIELDS, SalesRecord, User,
    strip_reserved,
};
