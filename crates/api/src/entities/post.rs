use chrono::{DateTime, Utc};
use db::models::PostEntry;
use serde::Serialize;

use super::{Account, GroupView};

#[derive(Clone, Serialize, Debug)]
pub struct PostView {
    pub id: String,
    pub text: String,
    pub author: Account,
    pub group: Option<GroupView>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl PostView {
    pub fn new(entry: PostEntry) -> Self {
        Self {
            url: format!("/posts/{}/", entry.post.id),
            id: entry.post.id.to_string(),
            text: entry.post.text,
            author: Account::new(entry.author),
            group: entry.group.map(GroupView::new),
            image: entry.post.image,
            created_at: entry.post.published,
        }
    }
}
