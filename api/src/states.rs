use crate::service::MicroBlogService;
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every handler by axum; the clone is one `Arc` bump.
///
/// The service is built in `main` and handed in here, so handlers never
/// reach for global state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MicroBlogService>,
}

impl AppState {
    pub fn new(service: Arc<MicroBlogService>) -> Self {
        Self { service }
    }
}
