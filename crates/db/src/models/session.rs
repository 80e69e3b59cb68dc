use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::sessions, types::DbId, utils::random_string};

pub const TOKEN_LENGTH: usize = 60;

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub id: DbId,
    pub token: String,
    pub user_id: DbId,
    pub published: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: DbId) -> Self {
        Self {
            id: DbId::default(),
            token: random_string(TOKEN_LENGTH),
            user_id,
            published: Utc::now(),
        }
    }

    pub async fn create(self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Self> {
        Ok(insert_into(sessions::table)
            .values(self)
            .get_result::<Session>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn by_token(
        token: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let session = sessions::table
            .filter(sessions::token.eq(token.to_string()))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match session {
            Ok(session) => Ok(Some(session)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete_by_token(
        token: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        let rows_affected = delete(sessions::table.filter(sessions::token.eq(token.to_string())))
            .execute(&mut db_pool.get().await?)
            .await?;
        Ok(rows_affected > 0)
    }
}
