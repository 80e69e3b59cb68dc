use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    middleware::from_fn_with_state,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Json, Router,
};
use db::{models::User, pagination::PaginationQuery};
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::{login_required, optional_login},
    common::{follows, listings},
    entities::{FeedView, ProfileView},
    error::ApiError,
};

pub async fn http_get_profile(
    state: State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PaginationQuery>,
    Extension(viewer): Extension<Option<User>>,
) -> Result<impl IntoResponse, AppError> {
    let listing = listings::profile_posts(
        state.store.as_ref(),
        &state.paginator(),
        &username,
        viewer.as_ref(),
        query.page(),
    )
    .await?;

    match listing {
        Some(listing) => Ok(Json(ProfileView::from(listing)).into_response()),
        None => Ok(ApiError::not_found().into_response()),
    }
}

pub async fn http_get_feed(
    state: State<Arc<AppState>>,
    Query(query): Query<PaginationQuery>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let page =
        listings::follow_feed(state.store.as_ref(), &state.paginator(), &user, query.page()).await?;
    Ok(Json(FeedView {
        following: true,
        page: page.into(),
    }))
}

pub async fn http_post_follow(
    state: State<Arc<AppState>>,
    Path(username): Path<String>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let author = match state.store.user_by_name(&username).await? {
        Some(author) => author,
        None => return Ok(ApiError::not_found().into_response()),
    };

    follows::follow(state.store.as_ref(), &user, &author).await?;
    Ok(Redirect::to(&format!("/profile/{}/", author.name)).into_response())
}

pub async fn http_post_unfollow(
    state: State<Arc<AppState>>,
    Path(username): Path<String>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let author = match state.store.user_by_name(&username).await? {
        Some(author) => author,
        None => return Ok(ApiError::not_found().into_response()),
    };

    follows::unfollow(state.store.as_ref(), &user, &author).await?;
    Ok(Redirect::to(&format!("/profile/{}/", author.name)).into_response())
}

pub fn profiles(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile/:username/",
            get(http_get_profile.layer(from_fn_with_state(Arc::clone(state), optional_login))),
        )
        .route(
            "/profile/:username/follow/",
            post(http_post_follow.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
        .route(
            "/profile/:username/unfollow/",
            post(http_post_unfollow.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
        .route(
            "/follow/",
            get(http_get_feed.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use db::{
        models::{Post, User},
        Store,
    };

    use super::super::test_utils::{json, location, TestApp};

    async fn post(app: &TestApp, author: &User, text: &str) {
        app.store
            .create_post(Post::new(author.id.clone(), None, text.to_string(), None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn follow_then_unfollow_restores_count() {
        let app = TestApp::new(10);
        let (_, reader) = app.user("reader").await;
        app.user("author").await;
        let before = app.store.count_follows().await.unwrap();

        let response = app
            .post_form("/profile/author/follow/", Some(&reader), "")
            .await;
        assert_eq!(location(&response), "/profile/author/");
        assert_eq!(app.store.count_follows().await.unwrap(), before + 1);

        let body = json(app.get("/profile/author/", Some(&reader)).await).await;
        assert_eq!(body["following"], true);

        let response = app
            .post_form("/profile/author/unfollow/", Some(&reader), "")
            .await;
        assert_eq!(location(&response), "/profile/author/");
        assert_eq!(app.store.count_follows().await.unwrap(), before);
    }

    #[tokio::test]
    async fn follow_is_idempotent_and_skips_self() {
        let app = TestApp::new(10);
        let (_, reader) = app.user("reader").await;
        app.user("author").await;

        app.post_form("/profile/reader/follow/", Some(&reader), "")
            .await;
        assert_eq!(app.store.count_follows().await.unwrap(), 0);

        app.post_form("/profile/author/follow/", Some(&reader), "")
            .await;
        app.post_form("/profile/author/follow/", Some(&reader), "")
            .await;
        assert_eq!(app.store.count_follows().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn anonymous_follow_goes_to_login() {
        let app = TestApp::new(10);
        app.user("author").await;

        let response = app.post_form("/profile/author/follow/", None, "").await;
        assert_eq!(
            location(&response),
            "/auth/login/?next=%2Fprofile%2Fauthor%2Ffollow%2F"
        );
        let response = app.post_form("/profile/author/unfollow/", None, "").await;
        assert_eq!(
            location(&response),
            "/auth/login/?next=%2Fprofile%2Fauthor%2Funfollow%2F"
        );
        assert_eq!(app.store.count_follows().await.unwrap(), 0);

        let response = app.get("/follow/", None).await;
        assert_eq!(location(&response), "/auth/login/?next=%2Ffollow%2F");
    }

    #[tokio::test]
    async fn feed_shows_followed_authors_newest_first() {
        let app = TestApp::new(10);
        let (_, reader) = app.user("reader").await;
        let (a, _) = app.user("a").await;
        let (b, _) = app.user("b").await;
        let (c, _) = app.user("c").await;

        post(&app, &a, "a1").await;
        post(&app, &b, "b1").await;
        post(&app, &c, "c1").await;
        post(&app, &a, "a2").await;

        app.post_form("/profile/a/follow/", Some(&reader), "").await;
        app.post_form("/profile/b/follow/", Some(&reader), "").await;

        let body = json(app.get("/follow/", Some(&reader)).await).await;
        let texts: Vec<&str> = body["page"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["a2", "b1", "a1"]);
    }

    #[tokio::test]
    async fn profile_of_unknown_user() {
        let app = TestApp::new(10);
        let (_, reader) = app.user("reader").await;

        let response = app.get("/profile/nobody/", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = app
            .post_form("/profile/nobody/follow/", Some(&reader), "")
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn anonymous_profile_view() {
        let app = TestApp::new(10);
        let (author, _) = app.user("author").await;
        post(&app, &author, "hello").await;

        let body = json(app.get("/profile/author/", None).await).await;
        assert_eq!(body["author"]["username"], "author");
        assert_eq!(body["posts_count"], 1);
        assert_eq!(body["following"], false);
    }
}
