pub mod like;
pub mod post;
pub mod user;

pub use like::LikeEvent;
pub use post::Post;
pub use user::User;
