use std::collections::HashSet;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    models::{
        Comment, CommentEntry, Follow, Group, Post, PostEntry, PostFilter, PostUpdate, Session,
        User,
    },
    pagination::PageWindow,
    types::DbId,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

/// In-process [`Store`]. Rows are kept in insertion order; listings sort
/// newest-first with later insertions winning timestamp ties.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn entry(&self, post: &Post) -> anyhow::Result<PostEntry> {
        let author = self
            .users
            .iter()
            .find(|user| user.id == post.author_id)
            .cloned()
            .ok_or_else(|| anyhow!("author of post {} is missing", post.id))?;
        let group = post.group_id.as_ref().and_then(|group_id| {
            self.groups
                .iter()
                .find(|group| &group.id == group_id)
                .cloned()
        });
        Ok(PostEntry {
            post: post.clone(),
            author,
            group,
        })
    }

    fn selected(&self, filter: &PostFilter) -> Vec<&Post> {
        let followed: HashSet<&DbId> = match filter {
            PostFilter::FollowedBy(user_id) => self
                .follows
                .iter()
                .filter(|follow| &follow.user_id == user_id)
                .map(|follow| &follow.author_id)
                .collect(),
            _ => HashSet::new(),
        };

        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .rev()
            .filter(|post| match filter {
                PostFilter::All => true,
                PostFilter::Group(group_id) => post.group_id.as_ref() == Some(group_id),
                PostFilter::Author(author_id) => &post.author_id == author_id,
                PostFilter::FollowedBy(_) => followed.contains(&post.author_id),
            })
            .collect();
        posts.sort_by(|a, b| b.published.cmp(&a.published));
        posts
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn user_by_id(&self, id: &DbId) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| &user.id == id).cloned())
    }

    async fn user_by_name(&self, name: &str) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.name == name).cloned())
    }

    async fn create_user(&self, user: User) -> anyhow::Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|existing| existing.name == user.name) {
            return Err(anyhow!("user name {} is taken", user.name));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &DbId) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|user| &user.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        let removed: HashSet<DbId> = tables
            .posts
            .iter()
            .filter(|post| &post.author_id == id)
            .map(|post| post.id.clone())
            .collect();
        tables.posts.retain(|post| !removed.contains(&post.id));
        tables
            .comments
            .retain(|comment| &comment.author_id != id && !removed.contains(&comment.post_id));
        tables
            .follows
            .retain(|follow| &follow.user_id != id && &follow.author_id != id);
        tables.sessions.retain(|session| &session.user_id != id);
        Ok(true)
    }

    async fn create_session(&self, user_id: &DbId) -> anyhow::Result<Session> {
        let session = Session::new(user_id.clone());
        self.tables.write().await.sessions.push(session.clone());
        Ok(session)
    }

    async fn session_by_token(&self, token: &str) -> anyhow::Result<Option<Session>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|session| session.token == token)
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|session| session.token != token);
        Ok(tables.sessions.len() != before)
    }

    async fn group_by_id(&self, id: &DbId) -> anyhow::Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|group| &group.id == id).cloned())
    }

    async fn group_by_slug(&self, slug: &str) -> anyhow::Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|group| group.slug == slug).cloned())
    }

    async fn groups(&self) -> anyhow::Result<Vec<Group>> {
        let mut groups = self.tables.read().await.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn create_group(&self, group: Group) -> anyhow::Result<Group> {
        let mut tables = self.tables.write().await;
        if tables.groups.iter().any(|existing| existing.slug == group.slug) {
            return Err(anyhow!("group slug {} is taken", group.slug));
        }
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn delete_group(&self, id: &DbId) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.groups.len();
        tables.groups.retain(|group| &group.id != id);
        if tables.groups.len() == before {
            return Ok(false);
        }

        for post in tables.posts.iter_mut() {
            if post.group_id.as_ref() == Some(id) {
                post.group_id = None;
            }
        }
        Ok(true)
    }

    async fn post_by_id(&self, id: &DbId) -> anyhow::Result<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|post| &post.id == id).cloned())
    }

    async fn post_entry(&self, id: &DbId) -> anyhow::Result<Option<PostEntry>> {
        let tables = self.tables.read().await;
        tables
            .posts
            .iter()
            .find(|post| &post.id == id)
            .map(|post| tables.entry(post))
            .transpose()
    }

    async fn count_posts(&self, filter: &PostFilter) -> anyhow::Result<i64> {
        Ok(self.tables.read().await.selected(filter).len() as i64)
    }

    async fn posts(
        &self,
        filter: &PostFilter,
        window: &PageWindow,
    ) -> anyhow::Result<Vec<PostEntry>> {
        let tables = self.tables.read().await;
        tables
            .selected(filter)
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .map(|post| tables.entry(post))
            .collect()
    }

    async fn create_post(&self, post: Post) -> anyhow::Result<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|user| user.id == post.author_id) {
            return Err(anyhow!("author {} does not exist", post.author_id));
        }
        if let Some(group_id) = &post.group_id {
            if !tables.groups.iter().any(|group| &group.id == group_id) {
                return Err(anyhow!("group {} does not exist", group_id));
            }
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: &Post, update: PostUpdate) -> anyhow::Result<Post> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .posts
            .iter_mut()
            .find(|stored| stored.id == post.id)
            .ok_or_else(|| anyhow!("post {} does not exist", post.id))?;
        stored.text = update.text;
        stored.group_id = update.group_id;
        stored.image = update.image;
        Ok(stored.clone())
    }

    async fn delete_post(&self, post: &Post) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|stored| stored.id != post.id);
        tables.comments.retain(|comment| comment.post_id != post.id);
        Ok(tables.posts.len() != before)
    }

    async fn comments(&self, post_id: &DbId) -> anyhow::Result<Vec<CommentEntry>> {
        let tables = self.tables.read().await;
        let mut comments = tables
            .comments
            .iter()
            .rev()
            .filter(|comment| &comment.post_id == post_id)
            .map(|comment| {
                let author = tables
                    .users
                    .iter()
                    .find(|user| user.id == comment.author_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("author of comment {} is missing", comment.id))?;
                Ok(CommentEntry {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        comments.sort_by(|a, b| b.comment.published.cmp(&a.comment.published));
        Ok(comments)
    }

    async fn create_comment(&self, comment: Comment) -> anyhow::Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|post| post.id == comment.post_id) {
            return Err(anyhow!("post {} does not exist", comment.post_id));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn is_following(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .any(|follow| &follow.user_id == user_id && &follow.author_id == author_id))
    }

    async fn get_or_create_follow(
        &self,
        user_id: &DbId,
        author_id: &DbId,
    ) -> anyhow::Result<(Follow, bool)> {
        let mut tables = self.tables.write().await;
        if let Some(follow) = tables
            .follows
            .iter()
            .find(|follow| &follow.user_id == user_id && &follow.author_id == author_id)
        {
            return Ok((follow.clone(), false));
        }

        let follow = Follow::new(user_id.clone(), author_id.clone());
        tables.follows.push(follow.clone());
        Ok((follow, true))
    }

    async fn delete_follows(&self, user_id: &DbId, author_id: &DbId) -> anyhow::Result<usize> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|follow| !(&follow.user_id == user_id && &follow.author_id == author_id));
        Ok(before - tables.follows.len())
    }

    async fn count_follows(&self) -> anyhow::Result<i64> {
        Ok(self.tables.read().await.follows.len() as i64)
    }
}
