//! Shared types for the bazaar marketplace
//!
//! Domain models, the unified error system and small utilities used by the
//! server and by anything that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
