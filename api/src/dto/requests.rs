use serde::Deserialize;
use validator::Validate;

// Emptiness is a domain rule and is checked by the service; these limits only
// keep oversized payloads out of memory.

#[derive(Debug, Validate, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
    pub username: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Content must be at most 5000 characters"))]
    pub content: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct LikeRequest {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: String,
}
