pub mod comments;
pub mod follows;
pub mod groups;
pub mod listings;
pub mod posts;
pub mod users;
