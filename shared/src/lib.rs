//! Shared types for The Cave
//!
//! Common types used by the server and the client: error types,
//! domain models, API DTOs and time utilities.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
