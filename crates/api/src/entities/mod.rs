pub mod account;
pub mod comment;
pub mod group;
pub mod listing;
pub mod page;
pub mod post;

pub use account::Account;
pub use comment::CommentView;
pub use group::GroupView;
pub use listing::{FeedView, GroupListingView, IndexView, PostDetailView, PostFormView, ProfileView};
pub use page::PageView;
pub use post::PostView;
