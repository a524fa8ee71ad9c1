//! Credential handling for SalesCast.
//!
//! - `password`: Argon2 hashing and verification. Plaintext passwords are never stored.
//! - `token`: HS256 access tokens in the standard `header.claims.signature` layout.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{AccessClaims, TokenSigner};
