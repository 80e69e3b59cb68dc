use diesel::{delete, dsl::count_star, insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::follows, types::DbId};

/// Directed edge: `user_id` follows `author_id`.
///
/// The table carries no unique constraint, so duplicates are only avoided by
/// going through [`Follow::get_or_create`].
#[derive(Queryable, Insertable, Identifiable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = follows)]
pub struct Follow {
    pub id: DbId,
    pub user_id: DbId,
    pub author_id: DbId,
}

impl Follow {
    pub fn new(user_id: DbId, author_id: DbId) -> Self {
        Self {
            id: DbId::default(),
            user_id,
            author_id,
        }
    }

    pub async fn get(
        user_id: &DbId,
        author_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let follow = follows::table
            .filter(follows::user_id.eq(user_id))
            .filter(follows::author_id.eq(author_id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match follow {
            Ok(follow) => Ok(Some(follow)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the edge and whether it was created by this call.
    pub async fn get_or_create(
        user_id: &DbId,
        author_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<(Self, bool)> {
        if let Some(follow) = Self::get(user_id, author_id, db_pool).await? {
            return Ok((follow, false));
        }

        let follow = insert_into(follows::table)
            .values(Self::new(user_id.clone(), author_id.clone()))
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?;
        Ok((follow, true))
    }

    pub async fn delete(
        user_id: &DbId,
        author_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<usize> {
        Ok(delete(
            follows::table
                .filter(follows::user_id.eq(user_id))
                .filter(follows::author_id.eq(author_id)),
        )
        .execute(&mut db_pool.get().await?)
        .await?)
    }

    pub async fn count(db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<i64> {
        Ok(follows::table
            .select(count_star())
            .first::<i64>(&mut db_pool.get().await?)
            .await?)
    }
}
