use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::db::favorites::AddFavorite;
use crate::db::{is_unique_violation, FavoriteRepository};
use crate::error::{ApiError, ValidationError, NOT_FOUND};
use crate::extract::ApiJson;
use crate::models::CatalogEntry;
use crate::routes::Results;
use crate::state::AppState;

const DUPLICATE_ENTRY: &str = "Duplicate entry.";

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub item_id: Option<i32>,
}

impl FavoriteRequest {
    fn item_id(&self) -> Result<i32, ValidationError> {
        self.item_id.ok_or(ValidationError::MissingField("item_id"))
    }
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Results<CatalogEntry>>, ApiError> {
    let results = FavoriteRepository::get_favorite_entries(state.pool(), user.user_id).await?;
    Ok(Json(Results { results }))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<FavoriteRequest>,
) -> Result<Response, ApiError> {
    let item_id = body.item_id()?;

    match FavoriteRepository::add_favorite(state.pool(), user.user_id, item_id).await {
        Ok(AddFavorite::Created(favorite)) => {
            info!(favorite_id = favorite.id, "Favorite added");
            Ok((StatusCode::CREATED, Json(favorite)).into_response())
        }
        Ok(AddFavorite::Duplicate) => Err(ApiError::Conflict(DUPLICATE_ENTRY)),
        Ok(AddFavorite::MissingItem) => Err(ApiError::NotFound(NOT_FOUND)),
        // A concurrent request inserted the same pair first.
        Err(err) if is_unique_violation(&err) => Err(ApiError::Conflict(DUPLICATE_ENTRY)),
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(body): ApiJson<FavoriteRequest>,
) -> Result<StatusCode, ApiError> {
    let item_id = body.item_id()?;

    if FavoriteRepository::remove_favorite(state.pool(), user.user_id, item_id).await? {
        info!("Favorite removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(NOT_FOUND))
    }
}
