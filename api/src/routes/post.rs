use crate::{
    AppState,
    dto::{CreatePostRequest, LikeRequest, LikeResponse},
    errors::ApiError,
    models::Post,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

/// POST /posts
/// Body: { "username": "...", "content": "..." }
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let post = state
        .service
        .create_post(&payload.username, &payload.content)?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
pub async fn get_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.service.get_all_posts())
}

/// POST /posts/{id}/like
/// Body: { "username": "..." }
///
/// Answers as soon as the like is queued. The like shows up in `GET /posts`
/// once a worker applies it, so an immediate re-read may not include it.
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<Json<LikeResponse>, ApiError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.service.like_post(id, &payload.username).await?;

    Ok(Json(LikeResponse {
        message: "Like accepted".to_string(),
    }))
}
