//! Catalog and favorites API: user signup/login, per-user favorites, and
//! read-only character/planet endpoints filled from a SWAPI-compatible source.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod import;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
pub mod swapi;
pub mod telemetry;

pub use config::Config;
pub use routes::create_router;
pub use state::AppState;

/// Builds the shared state from configuration: opens the pool, applies the
/// schema and prepares the token keys and catalog client.
pub async fn build_state(config: &Config) -> Result<AppState, anyhow::Error> {
    let pool = db::establish_connection_pool(&config.database_url, config.database_max_connections)?;
    db::run_migrations(&pool).await?;

    let tokens = auth::TokenKeys::from_secret(config.jwt_secret.as_bytes());
    let swapi = swapi::SwapiClient::new(config.swapi_base_url.clone())?;

    Ok(AppState::new(pool, tokens, swapi))
}
