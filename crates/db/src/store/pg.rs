use async_trait::async_trait;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection,
};

use super::Store;
use crate::{
    models::{
        Comment, CommentEntry, Follow, Group, Post, PostEntry, PostFilter, PostUpdate, Session,
        User,
    },
    pagination::PageWindow,
    types::DbId,
};

#[derive(Clone)]
pub struct PgStore {
    pub db_pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    pub fn new(db_pool: Pool<AsyncPgConnection>) -> Self {
        Self { db_pool }
    }

    pub fn connect(uri: &str) -> anyhow::Result<Self> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(uri);
        Ok(Self::new(Pool::builder(config).build()?))
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let mut connection = self.db_pool.get().await?;
        crate::migrations::run_migrations(&mut connection).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_id(&self, id: &DbId) -> anyhow::Result<Option<User>> {
        User::by_id(id, &self.db_pool).await
    }

    async fn user_by_name(&self, name: &str) -> anyhow::Result<Option<User>> {
        User::by_name(name, &self.db_pool).await
    }

    async fn create_user(&self, user: User) -> anyhow::Result<User> {
        user.create(&self.db_pool).await
    }

    async fn delete_user(&self, id: &DbId) -> anyhow::Result<bool> {
        match User::by_id(id, &self.db_pool).await? {
            Some(user) => user.delete(&self.db_pool).await,
            None => Ok(false),
        }
    }

    async fn create_session(&self, user_id: &DbId) -> anyhow::Result<Session> {
        Session::new(user_id.clone()).create(&self.db_pool).await
    }

    async fn session_by_token(&self, token: &str) -> anyhow::Result<Option<Session>> {
        Session::by_token(token, &self.db_pool).await
    }

    async fn delete_session(&self, token: &str) -> anyhow::Result<bool> {
        Session::delete_by_token(token, &self.db_pool).await
    }

    async fn group_by_id(&self, id: &DbId) -> anyhow::Result<Option<Group>> {
        Group::by_id(id, &self.db_pool).await
    }

    async fn group_by_slug(&self, slug: &str) -> anyhow::Result<Option<Group>> {
        Group::by_slug(slug, &self.db_pool).await
    }

    async fn groups(&self) -> anyhow::Result<Vec<Group>> {
        Group::all(&self.db_pool).await
    }

    async fn create_group(&self, group: Group) -> anyhow::Result<Group> {
        group.create(&self.db_pool).await
    }

    async fn delete_group(&self, id: &DbId) -> anyhow::Result<bool> {
        match Group::by_id(id, &self.db_pool).await? {
            Some(group) => group.delete(&self.db_pool).await,
            None => Ok(false),
        }
    }

    async fn post_by_id(&self, id: &DbId) -> anyhow::Result<Option<Post>> {
        Post::by_id(id, &self.db_pool).await
    }

    async fn post_entry(&self, id: &DbId) -> anyhow::Result<Option<PostEntry>> {
        match Post::by_id(id, &self.db_pool).await? {
            Some(post) => Ok(Post::entries(vec![post], &self.db_pool).await?.pop()),
            None => Ok(None),
        }
    }

    async fn count_posts(&self, filter: &PostFilter) -> anyhow::Result<i64> {
        Post::count(filter, &self.db_pool).await
    }

    async fn posts(
        &self,
        filter: &PostFilter,
        window: &PageWindow,
    ) -> anyhow::Result<Vec<PostEntry>> {
        Post::list(filter, window, &self.db_pool).await
    }

    async fn create_post(&self, post: Post) -> anyhow::Result<Post> {
        post.create(&self.db_pool).await
    }

    async fn update_post(&self, post: &Post, update: PostUpdate) -> anyhow::Result<Post> {
        post.update(update, &self.db_pool).await
    }

    async fn delete_post(&self, post: &Post) -> anyhow::Result<bool> {
        post.delete(&self.db_pool).await
    }

    async fn comments(&self, post_id: &DbId) -> anyhow::Result<Vec<CommentEntry>> {
        Comment::by_post(post_id, &self.db_pool).await
    }

    async fn create_comment(&self, comment: Comment) -> anyhow::Result<Comment> {
        comment.create(&self.db_pool).await
    }

    async fn is_following(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<bool> {
        Ok(Follow::get(user_id, author_id, &self.db_pool)
            .await?
            .is_some())
    }

    async fn get_or_create_follow(
        &self,
        user_id: &DbId,
        author_id: &DbId,
    ) -> anyhow::Result<(Follow, bool)> {
        Follow::get_or_create(user_id, author_id, &self.db_pool).await
    }

    async fn delete_follows(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<usize> {
        Follow::delete(user_id, author_id, &self.db_pool).await
    }

    async fn count_follows(&self) -> anyhow::Result<i64> {
        Follow::count(&self.db_pool).await
    }
}
