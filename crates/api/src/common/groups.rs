use anyhow::anyhow;
use db::{models::Group, Store};
use lazy_static::lazy_static;
use regex::Regex;

pub const SLUG_RE: &str = r"^[-a-zA-Z0-9_]+$";

lazy_static! {
    static ref SLUG: Regex = Regex::new(SLUG_RE).unwrap();
}

pub fn valid_slug(slug: &str) -> bool {
    slug.len() <= 200 && SLUG.is_match(slug)
}

pub async fn create(
    title: String,
    slug: String,
    description: String,
    store: &dyn Store,
) -> anyhow::Result<Group> {
    if title.trim().is_empty() || title.chars().count() > 200 {
        return Err(anyhow!("group title must be 1 to 200 characters"));
    }
    if !valid_slug(&slug) {
        return Err(anyhow!("invalid group slug {slug:?}"));
    }
    if store.group_by_slug(&slug).await?.is_some() {
        return Err(anyhow!("group slug {slug} is taken"));
    }

    let group = store
        .create_group(Group::new(title, slug, description))
        .await?;
    log::info!("Created group {}", group.slug);
    Ok(group)
}

/// Posts of the group stay, without a group.
pub async fn delete(slug: &str, store: &dyn Store) -> anyhow::Result<bool> {
    match store.group_by_slug(slug).await? {
        Some(group) => {
            let deleted = store.delete_group(&group.id).await?;
            log::info!("Deleted group {}", group.slug);
            Ok(deleted)
        }
        None => Ok(false),
    }
}
