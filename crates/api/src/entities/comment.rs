use chrono::{DateTime, Utc};
use db::models::CommentEntry;
use serde::Serialize;

use super::Account;

#[derive(Clone, Serialize, Debug)]
pub struct CommentView {
    pub id: String,
    pub text: String,
    pub author: Account,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(entry: CommentEntry) -> Self {
        Self {
            id: entry.comment.id.to_string(),
            text: entry.comment.text,
            author: Account::new(entry.author),
            created_at: entry.comment.published,
        }
    }
}
