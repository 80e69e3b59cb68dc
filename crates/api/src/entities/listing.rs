use db::models::{Group, PostEntry};
use serde::Serialize;

use super::{Account, CommentView, GroupView, PageView, PostView};
use crate::common::listings::{GroupListing, PostDetail, ProfileListing};

/// Length of the post text shown as the title of its own page
pub const POST_TITLE_LENGTH: usize = 30;

#[derive(Serialize, Debug)]
pub struct IndexView {
    pub title: &'static str,
    pub page: PageView<PostView>,
}

#[derive(Serialize, Debug)]
pub struct GroupListingView {
    pub title: String,
    pub group: GroupView,
    pub page: PageView<PostView>,
}

#[derive(Serialize, Debug)]
pub struct ProfileView {
    pub author: Account,
    pub posts_count: i64,
    pub following: bool,
    pub page: PageView<PostView>,
}

#[derive(Serialize, Debug)]
pub struct FeedView {
    pub following: bool,
    pub page: PageView<PostView>,
}

#[derive(Serialize, Debug)]
pub struct PostDetailView {
    pub post: PostView,
    pub post_title: String,
    pub posts_count: i64,
    pub comments: Vec<CommentView>,
    pub comment_count: usize,
}

/// What a client needs to draw the post form.
#[derive(Serialize, Debug)]
pub struct PostFormView {
    pub is_edit: bool,
    pub post: Option<PostView>,
    pub groups: Vec<GroupView>,
}

impl From<GroupListing> for GroupListingView {
    fn from(listing: GroupListing) -> Self {
        Self {
            title: format!("Posts of the {} group", listing.group.slug),
            group: GroupView::new(listing.group),
            page: listing.page.into(),
        }
    }
}

impl From<ProfileListing> for ProfileView {
    fn from(listing: ProfileListing) -> Self {
        Self {
            author: Account::new(listing.author),
            posts_count: listing.posts_count,
            following: listing.following,
            page: listing.page.into(),
        }
    }
}

impl From<PostDetail> for PostDetailView {
    fn from(detail: PostDetail) -> Self {
        let post_title = detail
            .entry
            .post
            .text
            .chars()
            .take(POST_TITLE_LENGTH)
            .collect();
        Self {
            post: PostView::new(detail.entry),
            post_title,
            posts_count: detail.posts_count,
            comment_count: detail.comments.len(),
            comments: detail.comments.into_iter().map(CommentView::new).collect(),
        }
    }
}

impl PostFormView {
    pub fn new(post: Option<PostEntry>, groups: Vec<Group>) -> Self {
        Self {
            is_edit: post.is_some(),
            post: post.map(PostView::new),
            groups: groups.into_iter().map(GroupView::new).collect(),
        }
    }
}
