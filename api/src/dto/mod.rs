pub mod requests;
pub mod responses;

pub use requests::{CreatePostRequest, LikeRequest, RegisterRequest};
pub use responses::{LikeResponse, UserResponse};
