//! cave-server: household purchase tracker with contribution suggestions
//!
//! - Members, products and purchase history stored in PostgreSQL
//! - JWT-authenticated REST API
//! - "Ask the Cave": suggests who should buy next (see [`nudge`])

pub mod api;
pub mod auth;
pub mod cleanup;
pub mod config;
pub mod db;
pub mod error;
pub mod genai;
pub mod nudge;
pub mod state;
pub mod util;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use config::Config;
pub use state::AppState;

/// Create the `admin` account when `ADMIN_PASSWORD` is configured
pub async fn seed_admin(state: &AppState, config: &Config) -> Result<(), BoxError> {
    let Some(password) = config.admin_password.as_deref() else {
        return Ok(());
    };
    let hashed = util::hash_password(password).map_err(|e| format!("hash admin password: {e}"))?;
    if db::users::seed_admin(&state.pool, "admin", &hashed, util::now_millis()).await? {
        tracing::info!("Admin account created");
    }
    Ok(())
}
