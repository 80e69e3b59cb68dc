use chrono::{DateTime, Utc};
use db::models::User;
use serde::Serialize;

#[derive(Clone, Serialize, Debug)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            display_name: user.display_name.unwrap_or_else(|| user.name.clone()),
            username: user.name,
            created_at: user.published,
        }
    }
}
