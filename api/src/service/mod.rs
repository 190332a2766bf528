// ============================================================================
// DOMAIN SERVICE - Business rules over the guarded stores
// ============================================================================
// Registration, posting and listing are synchronous. Liking is split in
// two: `like_post` validates and queues, `process_like_event` (run by the
// like workers) applies the change.

mod post;
mod user;

use crate::{
    models::{Post, User},
    queue::{LikeQueue, QueueError},
    storage::{AtomicCounter, GuardedList, GuardedMap, StorageError},
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
    #[error("user {0} already exists")]
    AlreadyExists(String),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("post {0} not found")]
    PostNotFound(u64),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::PostNotFound(_))
    }
}

/// Owns all users and posts plus the handle used to queue likes
///
/// Constructed once at startup and shared behind an `Arc`.
pub struct MicroBlogService {
    users: GuardedMap<String, User>,
    posts: GuardedList<Post>,
    user_ids: AtomicCounter,
    post_ids: AtomicCounter,
    like_queue: Arc<LikeQueue>,
}

impl MicroBlogService {
    pub fn new(like_queue: Arc<LikeQueue>) -> Self {
        Self {
            users: GuardedMap::new(),
            posts: GuardedList::new(),
            user_ids: AtomicCounter::new(0),
            post_ids: AtomicCounter::new(0),
            like_queue,
        }
    }

    pub fn like_queue(&self) -> &LikeQueue {
        &self.like_queue
    }

    /// Point the like queue's workers at `process_like_event`.
    pub fn start_like_workers(self: &Arc<Self>) -> Result<(), ServiceError> {
        let service = Arc::clone(self);
        self.like_queue
            .start(move |event| service.process_like_event(event))?;
        Ok(())
    }

    /// Stop accepting likes and wait until every queued like is applied.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.like_queue.stop().await?;
        Ok(())
    }
}
