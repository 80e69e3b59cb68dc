use db::{
    models::{Post, PostUpdate, User},
    Store,
};

use crate::{error::FormErrors, forms::PostForm};

pub enum EditOutcome {
    Updated(Post),
    /// The actor is not the author; nothing was changed.
    NotAuthor,
    Invalid(FormErrors),
}

pub enum DeleteOutcome {
    Deleted,
    NotAuthor,
}

pub fn is_author(post: &Post, user: &User) -> bool {
    post.author_id == user.id
}

/// The actor becomes the author of the new post.
pub async fn create(
    store: &dyn Store,
    author: &User,
    form: PostForm,
) -> anyhow::Result<Result<Post, FormErrors>> {
    let valid = match form.validate(store).await? {
        Ok(valid) => valid,
        Err(errors) => return Ok(Err(errors)),
    };

    let post = store
        .create_post(Post::new(
            author.id.clone(),
            valid.group_id,
            valid.text,
            valid.image,
        ))
        .await?;
    log::info!("{} published post {}", author.name, post.id);
    Ok(Ok(post))
}

/// Only the author may edit. A form without an image keeps the current one.
pub async fn edit(
    store: &dyn Store,
    actor: &User,
    post: &Post,
    form: PostForm,
) -> anyhow::Result<EditOutcome> {
    if !is_author(post, actor) {
        return Ok(EditOutcome::NotAuthor);
    }

    let valid = match form.validate(store).await? {
        Ok(valid) => valid,
        Err(errors) => return Ok(EditOutcome::Invalid(errors)),
    };

    let post = store
        .update_post(
            post,
            PostUpdate {
                text: valid.text,
                group_id: valid.group_id,
                image: valid.image.or_else(|| post.image.clone()),
            },
        )
        .await?;
    Ok(EditOutcome::Updated(post))
}

/// Only the author may delete; anyone else gets the same silent refusal as
/// for editing.
pub async fn delete(store: &dyn Store, actor: &User, post: &Post) -> anyhow::Result<DeleteOutcome> {
    if !is_author(post, actor) {
        log::warn!("{} tried to delete post {} of another user", actor.name, post.id);
        return Ok(DeleteOutcome::NotAuthor);
    }

    store.delete_post(post).await?;
    log::info!("{} deleted post {}", actor.name, post.id);
    Ok(DeleteOutcome::Deleted)
}
