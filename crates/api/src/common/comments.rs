use db::{
    models::{Comment, Post, User},
    Store,
};

use crate::forms::CommentForm;

/// Attaches a comment by `author` to `post`. An invalid form is dropped and
/// yields `None`.
pub async fn add(
    store: &dyn Store,
    author: &User,
    post: &Post,
    form: CommentForm,
) -> anyhow::Result<Option<Comment>> {
    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            log::debug!("Dropping invalid comment on {}: {:?}", post.id, errors);
            return Ok(None);
        }
    };

    let comment = store
        .create_comment(Comment::new(post.id.clone(), author.id.clone(), text))
        .await?;
    Ok(Some(comment))
}
