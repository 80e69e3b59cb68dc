use std::collections::HashMap;

use diesel::{delete, insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::groups, types::DbId};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = groups)]
pub struct Group {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: DbId::default(),
            title,
            slug,
            description,
        }
    }

    pub async fn by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let group = groups::table
            .filter(groups::id.eq(id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match group {
            Ok(group) => Ok(Some(group)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_slug(
        slug: &str,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let group = groups::table
            .filter(groups::slug.eq(slug.to_string()))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match group {
            Ok(group) => Ok(Some(group)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn by_ids(
        ids: Vec<DbId>,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<HashMap<DbId, Self>> {
        Ok(groups::table
            .filter(groups::id.eq_any(ids))
            .load::<Self>(&mut db_pool.get().await?)
            .await?
            .into_iter()
            .map(|group| (group.id.clone(), group))
            .collect())
    }

    pub async fn all(db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Vec<Self>> {
        Ok(groups::table
            .order(groups::title.asc())
            .load::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    pub async fn create(self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<Self> {
        Ok(insert_into(groups::table)
            .values(self)
            .get_result::<Self>(&mut db_pool.get().await?)
            .await?)
    }

    /// Posts of the group keep existing with a null group (`ON DELETE SET NULL`).
    pub async fn delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<bool> {
        let rows_affected = delete(groups::table.filter(groups::id.eq(&self.id)))
            .execute(&mut db_pool.get().await?)
            .await?;
        Ok(rows_affected > 0)
    }
}
