//! # SalesCast Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL database.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application talks to the
//!   `UserStore`, `SalesStore` and `Repository` traits.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`) for concurrent database access.
//!
//! ## Public API
//!
//! - `connect`: Builds the pool and performs the startup connectivity check.
//! - `run_migrations`: Applies the embedded migrations.
//! - `DbRepository`: The Postgres-backed implementation of the store traits.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{check_connection, connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use store::{Repository, SalesStore, UserStore};
