use crate::{
    AppState,
    dto::{RegisterRequest, UserResponse},
    errors::ApiError,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

/// POST /register
/// Body: { "username": "..." }
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state.service.register_user(&payload.username)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .service
        .get_user(&username)
        .map_err(|e| ApiError::NotFound(e.to_string()))?;

    Ok(Json(user.into()))
}
