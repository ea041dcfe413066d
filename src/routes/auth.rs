use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::extract::{required, ApiJson};
use crate::models::NewUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub planet: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub response: LoginSummary,
}

/// What a client learns about itself on login. Never carries the password.
#[derive(Debug, Serialize)]
pub struct LoginSummary {
    pub token: String,
    pub username: String,
    pub planet: String,
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_user = NewUser {
        username: required("username", body.username)?,
        email: required("email", body.email)?,
        password: required("password", body.password)?,
        planet: required("planet", body.planet)?,
    };

    let user = UserRepository::create_user(state.pool(), new_user).await?;
    info!(user_id = user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(json!({ "response": "Success" }))))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = required("email", body.email)?;
    let password = required("password", body.password)?;

    let user = UserRepository::find_by_credentials(state.pool(), email, password)
        .await?
        .ok_or(ApiError::NotFound("Incorrect email or password."))?;

    let token = state
        .tokens()
        .issue(user.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        response: LoginSummary {
            token,
            username: user.username,
            planet: user.planet,
        },
    }))
}
