//! Cave Client - HTTP client for cave-server
//!
//! Provides the REST calls used by front-ends plus an explicit [`Session`]
//! that tracks token expiry and server revalidation.

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::CaveClient;
pub use session::Session;

// Re-export shared types for convenience
pub use shared::client::{AskCaveResponse, AuthClaims, LoginResponse, PurchaseSnapshot};
