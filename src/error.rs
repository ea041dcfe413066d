//! Error types and their HTTP mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl turns
//! an error into a `{"msg": "..."}` JSON body with the matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::swapi::SwapiError;

pub const NOT_FOUND: &str = "Not found.";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Incomplete information: {0} is required.")]
    MissingField(&'static str),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Missing or unusable bearer token (401).
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    /// Uniqueness conflict such as a duplicate favorite (409).
    #[error("{0}")]
    Conflict(&'static str),
    /// The catalog API could not be read (502).
    #[error(transparent)]
    Upstream(#[from] SwapiError),
    /// Persistence failure (500). The error text is returned to the caller.
    #[error(transparent)]
    Database(#[from] anyhow::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Database(err) => error!("Database error: {:#}", err),
            Self::Internal(message) => error!("Internal error: {}", message),
            Self::Upstream(err) => warn!("Catalog API error: {}", err),
            other => debug!(status = %status, "{}", other),
        }

        let message = match &self {
            Self::Internal(_) => "an internal error occurred".to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}
