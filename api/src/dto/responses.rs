use crate::models::User;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: String,
}

/// Like-queue figures reported by the health check
#[derive(Debug, Serialize)]
pub struct QueueHealth {
    pub pending: usize,
    pub capacity: usize,
    pub workers: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
    pub like_queue: QueueHealth,
}
