//! Authentication
//!
//! - [`JwtService`] - bearer token issuing and validation
//! - [`CurrentUser`] - verified caller identity (axum extractor)
//! - [`password`] - argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
