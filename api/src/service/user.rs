use super::{MicroBlogService, ServiceError};
use crate::{models::User, storage::StorageError};
use tracing::{info, warn};

impl MicroBlogService {
    pub fn register_user(&self, username: &str) -> Result<User, ServiceError> {
        if username.is_empty() {
            warn!("Registration rejected: empty username");
            return Err(ServiceError::EmptyInput("username"));
        }

        // ID is only drawn once the name is known to be free
        let user = self
            .users
            .insert_with(username.to_string(), || User {
                id: self.user_ids.increment(),
                username: username.to_string(),
            })
            .map_err(|e| match e {
                StorageError::KeyExists => ServiceError::AlreadyExists(username.to_string()),
                other => ServiceError::Storage(other),
            })
            .inspect_err(|_| warn!("Registration rejected: {} already exists", username))?;

        info!("New user registered: {} (id {})", user.username, user.id);
        Ok(user)
    }

    pub fn get_user(&self, username: &str) -> Result<User, ServiceError> {
        self.users
            .get(username)
            .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.users.exists(username)
    }
}
