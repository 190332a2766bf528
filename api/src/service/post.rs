use super::{MicroBlogService, ServiceError};
use crate::{
    models::{LikeEvent, Post},
    storage::StorageError,
};
use tracing::{debug, info, warn};

impl MicroBlogService {
    pub fn create_post(&self, username: &str, content: &str) -> Result<Post, ServiceError> {
        if content.is_empty() {
            warn!("Post rejected: empty content from {}", username);
            return Err(ServiceError::EmptyInput("content"));
        }

        let author = self.get_user(username).inspect_err(|_| {
            warn!("Post rejected: unknown author {}", username);
        })?;

        // ID drawn under the list's write lock so it always equals index + 1
        let post = self.posts.push_with(|_index| Post {
            id: self.post_ids.increment(),
            author_id: author.id,
            author: author.username.clone(),
            content: content.to_string(),
            likes: Vec::new(),
        });

        info!("Post created: {} by {}", post.id, username);
        Ok(post)
    }

    pub fn get_all_posts(&self) -> Vec<Post> {
        let posts = self.posts.get_all();
        debug!("Listing {} posts", posts.len());
        posts
    }

    /// Validate a like and queue it for the workers.
    ///
    /// `Ok` means the like was accepted, not that it is visible yet. It shows
    /// up in `get_all_posts` once a worker has applied it. Waits if the queue
    /// is full.
    pub async fn like_post(&self, post_id: u64, username: &str) -> Result<(), ServiceError> {
        if !self.user_exists(username) {
            warn!("Like rejected: unknown user {}", username);
            return Err(ServiceError::UserNotFound(username.to_string()));
        }

        if post_id == 0 || post_id > self.posts.len() as u64 {
            warn!("Like rejected: unknown post {}", post_id);
            return Err(ServiceError::PostNotFound(post_id));
        }

        self.like_queue
            .enqueue(LikeEvent::new(post_id, username))
            .await?;

        info!("Like from {} on post {} queued", username, post_id);
        Ok(())
    }

    /// Apply one queued like. Called only from the like workers.
    ///
    /// Liking the same post twice is a no-op.
    pub fn process_like_event(&self, event: LikeEvent) -> Result<(), ServiceError> {
        let index = event
            .post_id
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or(ServiceError::PostNotFound(event.post_id))?;

        let added = self
            .posts
            .update(index, |post| post.add_like(&event.username))
            .map_err(|e| match e {
                StorageError::IndexOutOfRange { .. } => ServiceError::PostNotFound(event.post_id),
                other => ServiceError::Storage(other),
            })?;

        if added {
            info!("Like from {} on post {} applied", event.username, event.post_id);
        } else {
            debug!("{} already likes post {}", event.username, event.post_id);
        }
        Ok(())
    }
}
