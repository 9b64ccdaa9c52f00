//! Application state for cave-server

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::BoxError;
use crate::auth::{JwtService, RateLimiter};
use crate::config::Config;
use crate::genai::{GeminiClient, TextGenerator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Token issuance and validation
    pub jwt_service: Arc<JwtService>,
    /// Reason generator; `None` means every suggestion uses the local template
    pub generator: Option<Arc<dyn TextGenerator>>,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
    /// Purchases older than this many months are eligible for cleanup
    pub purchase_retention_months: u32,
}

impl AppState {
    /// Connect to the database, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let generator = GeminiClient::from_config(config)
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
        if generator.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, suggestions will use the local template");
        }

        Ok(Self::with_parts(pool, config, generator))
    }

    /// Build the state around an existing pool (no migrations)
    pub fn with_parts(
        pool: PgPool,
        config: &Config,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            pool,
            jwt_service: Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiry_days)),
            generator,
            rate_limiter: RateLimiter::new(),
            purchase_retention_months: config.purchase_retention_months,
        }
    }
}
