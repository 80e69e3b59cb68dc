use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{
    models::User,
    schema::{comments, users},
    types::DbId,
};

#[derive(Queryable, Insertable, Identifiable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub published: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: User,
}

impl Comment {
    pub fn new(post_id: DbId, author_id: DbId, text: String) -> Self {
        Self {
            id: DbId::default(),
            post_id,
            author_id,
            text,
            published: Utc::now(),
        }
    }

    pub async fn create(self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Self> {
        Ok(insert_into(comments::table)
            .values(self)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn by_post(
        post_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<CommentEntry>> {
        Ok(comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id))
            .order((comments::published.desc(), comments::id.desc()))
            .select((Comment::as_select(), User::as_select()))
            .load::<(Comment, User)>(&mut db_pool.get().await?)
            .await?
            .into_iter()
            .map(|(comment, author)| CommentEntry { comment, author })
            .collect())
    }
}
