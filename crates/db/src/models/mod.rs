pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod session;
pub mod user;

pub use comment::{Comment, CommentEntry};
pub use follow::Follow;
pub use group::Group;
pub use post::{Post, PostEntry, PostFilter, PostUpdate};
pub use session::Session;
pub use user::User;
