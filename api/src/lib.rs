// ============================================================================
// MICROBLOG API
// ============================================================================
// - User registration and lookup
// - Post creation and listing
// - Likes accepted synchronously, applied by a background worker pool
// - Lock-guarded in-memory storage with atomic ID counters
// - Structured logging with a non-blocking file sink

pub mod config;
pub mod dto;
pub mod errors;
pub mod models;
pub mod queue;
pub mod routes;
pub mod service;
pub mod states;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use states::AppState;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the router with its middleware stack.
///
/// Every route except the like route runs under the request timeout. A like
/// waits for space in the like queue, and cancelling that wait would drop
/// the like.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let timed = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::user::register))
        .route("/users/{username}", get(routes::user::get_user))
        .route(
            "/posts",
            post(routes::post::create_post).get(routes::post::get_posts),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

    let likes = Router::new().route("/posts/{id}/like", post(routes::post::like_post));

    Router::new()
        .merge(timed)
        .merge(likes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
