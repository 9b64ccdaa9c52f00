//! cave-server: The Cave HTTP service
//!
//! Long-running service that:
//! - Serves the member/product/purchase REST API (JWT authenticated)
//! - Answers "Ask the Cave" contribution suggestions
//! - Periodically drops purchases older than the retention window

use cave_server::{AppState, BoxError, Config, api, cleanup, seed_admin};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cave_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting cave-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    seed_admin(&state, &config).await?;

    let app = api::create_router(state.clone());

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("cave-server HTTP listening on {http_addr}");

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    cleanup::spawn_periodic(
        state.pool.clone(),
        config.purchase_retention_months,
        config.cleanup_interval_hours,
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
