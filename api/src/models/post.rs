use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    /// Author's username at the time the post was written
    pub author: String,
    pub content: String,
    /// Usernames in the order their likes were applied
    pub likes: Vec<String>,
}

impl Post {
    pub fn liked_by(&self, username: &str) -> bool {
        self.likes.iter().any(|liker| liker == username)
    }

    /// Returns `false` when `username` had already liked the post.
    pub fn add_like(&mut self, username: &str) -> bool {
        if self.liked_by(username) {
            return false;
        }
        self.likes.push(username.to_string());
        true
    }
}
