use axum::{extract::State, response::Json};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{ApiError, NOT_FOUND};
use crate::extract::Uid;
use crate::models::{Character, Planet};
use crate::routes::Results;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_characters(State(state): State<AppState>) -> Result<Json<Results<Character>>, ApiError> {
    let results = CatalogRepository::get_all_characters(state.pool()).await?;
    Ok(Json(Results { results }))
}

#[instrument(skip(state, uid), fields(uid = uid.0))]
pub async fn get_character(State(state): State<AppState>, uid: Uid) -> Result<Json<Character>, ApiError> {
    CatalogRepository::get_character_by_uid(state.pool(), uid.0)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

#[instrument(skip(state))]
pub async fn list_planets(State(state): State<AppState>) -> Result<Json<Results<Planet>>, ApiError> {
    let results = CatalogRepository::get_all_planets(state.pool()).await?;
    Ok(Json(Results { results }))
}

#[instrument(skip(state, uid), fields(uid = uid.0))]
pub async fn get_planet(State(state): State<AppState>, uid: Uid) -> Result<Json<Planet>, ApiError> {
    CatalogRepository::get_planet_by_uid(state.pool(), uid.0)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}
