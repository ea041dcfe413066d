use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::state::AppState;

pub mod auth;
pub mod catalog;
pub mod favorites;
pub mod populate;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: i64,
}

/// `{"results": [...]}` wrapper used by every collection endpoint.
#[derive(Debug, Serialize)]
pub struct Results<T> {
    pub results: Vec<T>,
}

/// Health check endpoint
#[instrument]
async fn health() -> Json<HealthResponse> {
    info!("Health check requested");
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route(
            "/favorites",
            get(favorites::list_favorites)
                .post(favorites::add_favorite)
                .delete(favorites::remove_favorite),
        )
        .route("/characters", get(catalog::list_characters))
        .route("/characters/:uid", get(catalog::get_character))
        .route("/planets", get(catalog::list_planets))
        .route("/planets/:uid", get(catalog::get_planet))
        .route("/populate/characters", get(populate::populate_characters))
        .route("/populate/planets", get(populate::populate_planets))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
