//! API routes for cave-server

pub mod ask_cave;
pub mod auth;
pub mod cleanup;
pub mod health;
pub mod products;
pub mod purchases;
pub mod users;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let login = Router::new()
        .route("/api/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let members = Router::new()
        .route("/api/users", post(users::register).get(users::list))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(login)
        .merge(members)
        .route("/api/verify-token", post(auth::verify_token))
        .route("/api/users/me", get(users::me))
        .route("/api/users/{id}", get(users::get).put(users::update))
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/api/purchases", get(purchases::list).post(purchases::create))
        .route(
            "/api/purchases/{id}",
            axum::routing::delete(purchases::delete),
        )
        .route("/api/ask-cave", post(ask_cave::ask_cave))
        .route("/api/cleanup", get(cleanup::preview).post(cleanup::run))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
