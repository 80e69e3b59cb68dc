//! Repository seam between the web layer and persistence.
//!
//! [`pg::PgStore`] backs the running server, [`memory::MemoryStore`] keeps
//! everything in process and mirrors the foreign-key rules of the schema
//! (cascades on post and user deletion, set-null on group deletion).

pub mod memory;
pub mod pg;

use async_trait::async_trait;

pub use crate::models::PostFilter;
use crate::{
    models::{Comment, CommentEntry, Follow, Group, Post, PostEntry, PostUpdate, Session, User},
    pagination::PageWindow,
    types::DbId,
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn user_by_id(&self, id: &DbId) -> anyhow::Result<Option<User>>;
    async fn user_by_name(&self, name: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, user: User) -> anyhow::Result<User>;
    /// Removes the user with their sessions, posts, comments and follow edges.
    async fn delete_user(&self, id: &DbId) -> anyhow::Result<bool>;

    async fn create_session(&self, user_id: &DbId) -> anyhow::Result<Session>;
    async fn session_by_token(&self, token: &str) -> anyhow::Result<Option<Session>>;
    async fn delete_session(&self, token: &str) -> anyhow::Result<bool>;

    async fn group_by_id(&self, id: &DbId) -> anyhow::Result<Option<Group>>;
    async fn group_by_slug(&self, slug: &str) -> anyhow::Result<Option<Group>>;
    /// All groups ordered by title.
    async fn groups(&self) -> anyhow::Result<Vec<Group>>;
    async fn create_group(&self, group: Group) -> anyhow::Result<Group>;
    async fn delete_group(&self, id: &DbId) -> anyhow::Result<bool>;

    async fn post_by_id(&self, id: &DbId) -> anyhow::Result<Option<Post>>;
    async fn post_entry(&self, id: &DbId) -> anyhow::Result<Option<PostEntry>>;
    async fn count_posts(&self, filter: &PostFilter) -> anyhow::Result<i64>;
    /// The posts inside `window`, newest-first.
    async fn posts(&self, filter: &PostFilter, window: &PageWindow)
        -> anyhow::Result<Vec<PostEntry>>;
    async fn create_post(&self, post: Post) -> anyhow::Result<Post>;
    async fn update_post(&self, post: &Post, update: PostUpdate) -> anyhow::Result<Post>;
    async fn delete_post(&self, post: &Post) -> anyhow::Result<bool>;

    /// Comments of a post, newest-first.
    async fn comments(&self, post_id: &DbId) -> anyhow::Result<Vec<CommentEntry>>;
    async fn create_comment(&self, comment: Comment) -> anyhow::Result<Comment>;

    async fn is_following(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<bool>;
    async fn get_or_create_follow(
        &self,
        user_id: &DbId,
        author_id: &DbId,
    ) -> anyhow::Result<(Follow, bool)>;
    async fn delete_follows(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<usize>;
    async fn count_follows(&self) -> anyhow::Result<i64>;
}
