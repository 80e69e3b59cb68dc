use db::{
    models::{CommentEntry, Group, PostEntry, PostFilter, User},
    pagination::{Page, Paginator},
    types::DbId,
    Store,
};

pub struct GroupListing {
    pub group: Group,
    pub page: Page<PostEntry>,
}

pub struct ProfileListing {
    pub author: User,
    pub posts_count: i64,
    pub following: bool,
    pub page: Page<PostEntry>,
}

pub struct PostDetail {
    pub entry: PostEntry,
    pub posts_count: i64,
    pub comments: Vec<CommentEntry>,
}

async fn paginate(
    store: &dyn Store,
    filter: PostFilter,
    paginator: &Paginator,
    page: Option<&str>,
) -> anyhow::Result<Page<PostEntry>> {
    let window = paginator.window(store.count_posts(&filter).await?, page);
    let items = store.posts(&filter, &window).await?;
    Ok(Page::new(items, window))
}

pub async fn all_posts(
    store: &dyn Store,
    paginator: &Paginator,
    page: Option<&str>,
) -> anyhow::Result<Page<PostEntry>> {
    paginate(store, PostFilter::All, paginator, page).await
}

pub async fn group_posts(
    store: &dyn Store,
    paginator: &Paginator,
    slug: &str,
    page: Option<&str>,
) -> anyhow::Result<Option<GroupListing>> {
    let group = match store.group_by_slug(slug).await? {
        Some(group) => group,
        None => return Ok(None),
    };

    let page = paginate(store, PostFilter::Group(group.id.clone()), paginator, page).await?;
    Ok(Some(GroupListing { group, page }))
}

pub async fn profile_posts(
    store: &dyn Store,
    paginator: &Paginator,
    username: &str,
    viewer: Option<&User>,
    page: Option<&str>,
) -> anyhow::Result<Option<ProfileListing>> {
    let author = match store.user_by_name(username).await? {
        Some(author) => author,
        None => return Ok(None),
    };

    let following = match viewer {
        Some(viewer) => store.is_following(&viewer.id, &author.id).await?,
        None => false,
    };
    let page = paginate(store, PostFilter::Author(author.id.clone()), paginator, page).await?;

    Ok(Some(ProfileListing {
        posts_count: page.window.count,
        author,
        following,
        page,
    }))
}

pub async fn follow_feed(
    store: &dyn Store,
    paginator: &Paginator,
    viewer: &User,
    page: Option<&str>,
) -> anyhow::Result<Page<PostEntry>> {
    paginate(store, PostFilter::FollowedBy(viewer.id.clone()), paginator, page).await
}

pub async fn post_detail(store: &dyn Store, id: &DbId) -> anyhow::Result<Option<PostDetail>> {
    let entry = match store.post_entry(id).await? {
        Some(entry) => entry,
        None => return Ok(None),
    };

    let posts_count = store
        .count_posts(&PostFilter::Author(entry.author.id.clone()))
        .await?;
    let comments = store.comments(id).await?;

    Ok(Some(PostDetail {
        entry,
        posts_count,
        comments,
    }))
}

#[cfg(test)]
mod tests {
    use db::{
        models::{Comment, Post},
        MemoryStore,
    };

    use super::*;

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(User::new(name.to_string(), None, "hash".to_string()))
            .await
            .unwrap()
    }

    async fn post(store: &MemoryStore, author: &User, text: &str) -> Post {
        store
            .create_post(Post::new(author.id.clone(), None, text.to_string(), None))
            .await
            .unwrap()
    }

    fn texts(page: &Page<PostEntry>) -> Vec<&str> {
        page.items
            .iter()
            .map(|entry| entry.post.text.as_str())
            .collect()
    }

    #[tokio::test]
    async fn follow_feed_has_only_followed_authors() {
        let store = MemoryStore::new();
        let reader = user(&store, "reader").await;
        let a = user(&store, "a").await;
        let b = user(&store, "b").await;
        let c = user(&store, "c").await;

        post(&store, &a, "a1").await;
        post(&store, &c, "c1").await;
        post(&store, &b, "b1").await;
        post(&store, &reader, "own").await;
        post(&store, &a, "a2").await;

        store.get_or_create_follow(&reader.id, &a.id).await.unwrap();
        store.get_or_create_follow(&reader.id, &b.id).await.unwrap();

        let page = follow_feed(&store, &Paginator::new(10), &reader, None)
            .await
            .unwrap();
        assert_eq!(texts(&page), vec!["a2", "b1", "a1"]);
        assert_eq!(page.window.count, 3);
    }

    #[tokio::test]
    async fn empty_feed_without_follows() {
        let store = MemoryStore::new();
        let reader = user(&store, "reader").await;
        let author = user(&store, "author").await;
        post(&store, &author, "hello").await;

        let page = follow_feed(&store, &Paginator::new(10), &reader, None)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.window.num_pages, 1);
    }

    #[tokio::test]
    async fn group_listing_requires_existing_group() {
        let store = MemoryStore::new();
        let author = user(&store, "author").await;
        let group = store
            .create_group(Group::new(
                "Music".to_string(),
                "music".to_string(),
                "Songs".to_string(),
            ))
            .await
            .unwrap();
        store
            .create_post(Post::new(
                author.id.clone(),
                Some(group.id.clone()),
                "in group".to_string(),
                None,
            ))
            .await
            .unwrap();
        post(&store, &author, "outside").await;

        assert!(group_posts(&store, &Paginator::new(10), "nope", None)
            .await
            .unwrap()
            .is_none());

        let listing = group_posts(&store, &Paginator::new(10), "music", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listing.group.slug, "music");
        assert_eq!(texts(&listing.page), vec!["in group"]);
    }

    #[tokio::test]
    async fn profile_counts_and_follow_status() {
        let store = MemoryStore::new();
        let author = user(&store, "author").await;
        let reader = user(&store, "reader").await;
        for n in 0..5 {
            post(&store, &author, &format!("post {n}")).await;
        }
        post(&store, &reader, "not on the profile").await;

        let listing = profile_posts(&store, &Paginator::new(2), "author", None, Some("3"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listing.posts_count, 5);
        assert!(!listing.following);
        assert_eq!(texts(&listing.page), vec!["post 0"]);

        store
            .get_or_create_follow(&reader.id, &author.id)
            .await
            .unwrap();
        let listing = profile_posts(&store, &Paginator::new(2), "author", Some(&reader), None)
            .await
            .unwrap()
            .unwrap();
        assert!(listing.following);
        assert_eq!(texts(&listing.page), vec!["post 4", "post 3"]);
    }

    #[tokio::test]
    async fn detail_includes_comments() {
        let store = MemoryStore::new();
        let author = user(&store, "author").await;
        let other = post(&store, &author, "other").await;
        let post = post(&store, &author, "commented").await;
        store
            .create_comment(Comment::new(
                post.id.clone(),
                author.id.clone(),
                "first".to_string(),
            ))
            .await
            .unwrap();
        store
            .create_comment(Comment::new(
                post.id.clone(),
                author.id.clone(),
                "second".to_string(),
            ))
            .await
            .unwrap();
        store
            .create_comment(Comment::new(
                other.id.clone(),
                author.id.clone(),
                "elsewhere".to_string(),
            ))
            .await
            .unwrap();

        let detail = post_detail(&store, &post.id).await.unwrap().unwrap();
        assert_eq!(detail.posts_count, 2);
        let comments: Vec<&str> = detail
            .comments
            .iter()
            .map(|entry| entry.comment.text.as_str())
            .collect();
        assert_eq!(comments, vec!["second", "first"]);

        assert!(post_detail(&store, &DbId::from("missing"))
            .await
            .unwrap()
            .is_none());
    }
}
