use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::users, types::DbId};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = users)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub display_name: Option<String>,
    pub password_encrypted: Option<String>,
    pub published: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, display_name: Option<String>, password_encrypted: String) -> Self {
        Self {
            id: DbId::default(),
            name,
            display_name,
            password_encrypted: Some(password_encrypted),
            published: Utc::now(),
        }
    }

    pub async fn by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let user = users::table
            .filter(users::id.eq(id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match user {
            Ok(user) => Ok(Some(user)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_name(
        name: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let user = users::table
            .filter(users::name.eq(name.to_string()))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match user {
            Ok(user) => Ok(Some(user)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_ids(
        ids: Vec<DbId>,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<HashMap<DbId, Self>> {
        Ok(users::table
            .filter(users::id.eq_any(ids))
            .load::<Self>(&mut db_pool.get().await?)
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect())
    }

    pub async fn create(self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Self> {
        Ok(insert_into(users::table)
            .values(self)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    /// Posts, comments, follows and sessions of the user go with it
    /// (`ON DELETE CASCADE`).
    pub async fn delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<bool> {
        let rows_affected = delete(users::table.filter(users::id.eq(&self.id)))
            .execute(&mut db_pool.get().await?)
            .await?;
        Ok(rows_affected > 0)
    }
}
