//! Custom Axum extractors

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, ValidationError, NOT_FOUND};

/// `Json<T>` whose rejection is reported through [`ApiError`].
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// External catalog index taken from the last path segment. Anything that is
/// not an `i32` cannot name an entry and is reported as not found.
pub struct Uid(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for Uid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound(NOT_FOUND))?;

        match raw.parse::<i32>() {
            Ok(uid) => Ok(Self(uid)),
            Err(_) => {
                debug!(uid = %raw, "Path segment is not a catalog uid");
                Err(ApiError::NotFound(NOT_FOUND))
            }
        }
    }
}

/// Required, non-blank text field of a request body.
pub fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))
}
