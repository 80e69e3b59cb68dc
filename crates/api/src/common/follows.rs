use db::{models::User, Store};

/// Get-or-create of the `by -> to` edge. Following oneself is ignored.
/// Returns whether a new edge was stored.
pub async fn follow(store: &dyn Store, by: &User, to: &User) -> anyhow::Result<bool> {
    if by.id == to.id {
        return Ok(false);
    }

    let (_, created) = store.get_or_create_follow(&by.id, &to.id).await?;
    if created {
        log::info!("{} follows {}", by.name, to.name);
    }
    Ok(created)
}

pub async fn unfollow(store: &dyn Store, by: &User, to: &User) -> anyhow::Result<usize> {
    let removed = store.delete_follows(&by.id, &to.id).await?;
    if removed > 0 {
        log::info!("{} unfollowed {}", by.name, to.name);
    }
    Ok(removed)
}
