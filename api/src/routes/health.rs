use crate::{
    AppState,
    dto::responses::{HealthResponse, QueueHealth},
};
use axum::{Json, extract::State};
use chrono::Utc;

/// GET /health
/// Response: 200 OK with JSON, including like-queue depth
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let queue = state.service.like_queue();
    let status = if queue.is_closed() { "draining" } else { "healthy" };

    Json(HealthResponse {
        status,
        timestamp: Utc::now().timestamp(),
        like_queue: QueueHealth {
            pending: queue.len(),
            capacity: queue.capacity(),
            workers: queue.workers(),
        },
    })
}
