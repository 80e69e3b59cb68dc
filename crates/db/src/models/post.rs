use anyhow::anyhow;
use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, pg::Pg, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{
    models::{Group, User},
    pagination::PageWindow,
    schema::{follows, posts},
    types::DbId,
};

#[derive(Queryable, Insertable, Identifiable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: DbId,
    pub author_id: DbId,
    pub group_id: Option<DbId>,
    pub text: String,
    pub image: Option<String>,
    pub published: DateTime<Utc>,
}

#[derive(AsChangeset, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = posts, treat_none_as_null = true)]
pub struct PostUpdate {
    pub text: String,
    pub group_id: Option<DbId>,
    pub image: Option<String>,
}

/// A post together with the rows a listing shows next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

/// Which posts a listing selects. Every listing is ordered newest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(DbId),
    Author(DbId),
    /// Posts by every author the given user follows
    FollowedBy(DbId),
}

impl Post {
    pub fn new(
        author_id: DbId,
        group_id: Option<DbId>,
        text: String,
        image: Option<String>,
    ) -> Self {
        Self {
            id: DbId::default(),
            author_id,
            group_id,
            text,
            image,
            published: Utc::now(),
        }
    }

    pub async fn by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let post = posts::table
            .filter(posts::id.eq(id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match post {
            Ok(post) => Ok(Some(post)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn create(self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Self> {
        Ok(insert_into(posts::table)
            .values(self)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn update(
        &self,
        update: PostUpdate,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Self> {
        Ok(diesel::update(self)
            .set(update)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    /// Comments go with the post (`ON DELETE CASCADE`).
    pub async fn delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<bool> {
        let rows_affected = delete(posts::table.filter(posts::id.eq(&self.id)))
            .execute(&mut db_pool.get().await?)
            .await?;
        Ok(rows_affected > 0)
    }

    pub async fn count(
        filter: &PostFilter,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<i64> {
        Ok(filtered(filter)
            .count()
            .get_result::<i64>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn list(
        filter: &PostFilter,
        window: &PageWindow,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<PostEntry>> {
        let posts = filtered(filter)
            .order((posts::published.desc(), posts::id.desc()))
            .offset(window.offset)
            .limit(window.limit)
            .load::<Self>(&mut db_pool.get().await?)
            .await?;
        Self::entries(posts, db_pool).await
    }

    pub async fn entries(
        posts: Vec<Self>,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<PostEntry>> {
        let authors = User::by_ids(
            posts.iter().map(|post| post.author_id.clone()).collect(),
            db_pool,
        )
        .await?;
        let groups = Group::by_ids(
            posts.iter().filter_map(|post| post.group_id.clone()).collect(),
            db_pool,
        )
        .await?;

        posts
            .into_iter()
            .map(|post| {
                let author = authors
                    .get(&post.author_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("author of post {} is missing", post.id))?;
                let group = post
                    .group_id
                    .as_ref()
                    .and_then(|group_id| groups.get(group_id).cloned());
                Ok(PostEntry { post, author, group })
            })
            .collect()
    }
}

fn filtered(filter: &PostFilter) -> posts::BoxedQuery<'static, Pg> {
    let query = posts::table.into_boxed();
    match filter {
        PostFilter::All => query,
        PostFilter::Group(group_id) => {
            query.filter(posts::group_id.eq(Some(group_id.clone())))
        }
        PostFilter::Author(author_id) => query.filter(posts::author_id.eq(author_id.clone())),
        PostFilter::FollowedBy(user_id) => query.filter(
            posts::author_id.eq_any(
                follows::table
                    .filter(follows::user_id.eq(user_id.clone()))
                    .select(follows::author_id),
            ),
        ),
    }
}
