/// Intent to add `username` to the likes of post `post_id`
///
/// Lives only on the like queue; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeEvent {
    pub post_id: u64,
    pub username: String,
}

impl LikeEvent {
    pub fn new(post_id: u64, username: impl Into<String>) -> Self {
        Self {
            post_id,
            username: username.into(),
        }
    }
}
