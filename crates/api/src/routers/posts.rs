use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use db::{models::User, pagination::PaginationQuery, types::DbId};
use web::{errors::AppError, AppState};

use crate::{
    auth_middleware::login_required,
    common::{
        comments, listings,
        posts::{self, DeleteOutcome, EditOutcome},
    },
    entities::{IndexView, PostDetailView, PostFormView},
    error::ApiError,
    forms::{CommentForm, PostForm},
};

pub const INDEX_TITLE: &str = "Latest updates on the site";

fn detail_url(id: &DbId) -> String {
    format!("/posts/{id}/")
}

fn profile_url(user: &User) -> String {
    format!("/profile/{}/", user.name)
}

pub async fn http_get_index(
    state: State<Arc<AppState>>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = listings::all_posts(state.store.as_ref(), &state.paginator(), query.page()).await?;
    let cache_control = format!(
        "public, max-age={}",
        state.config.listing.index_cache_seconds
    );

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(IndexView {
            title: INDEX_TITLE,
            page: page.into(),
        }),
    ))
}

pub async fn http_get_detail(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = DbId::from(id);
    match listings::post_detail(state.store.as_ref(), &id).await? {
        Some(detail) => Ok(Json(PostDetailView::from(detail)).into_response()),
        None => Ok(ApiError::not_found().into_response()),
    }
}

pub async fn http_get_create(
    state: State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let groups = state.store.groups().await?;
    Ok(Json(PostFormView::new(None, groups)))
}

pub async fn http_post_create(
    state: State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Form(form): Form<PostForm>,
) -> Result<impl IntoResponse, AppError> {
    match posts::create(state.store.as_ref(), &user, form).await? {
        Ok(_) => Ok(Redirect::to(&profile_url(&user)).into_response()),
        Err(errors) => Ok(errors.into_response()),
    }
}

pub async fn http_get_edit(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let id = DbId::from(id);
    let entry = match state.store.post_entry(&id).await? {
        Some(entry) => entry,
        None => return Ok(ApiError::not_found().into_response()),
    };

    if !posts::is_author(&entry.post, &user) {
        return Ok(Redirect::to(&detail_url(&id)).into_response());
    }

    let groups = state.store.groups().await?;
    Ok(Json(PostFormView::new(Some(entry), groups)).into_response())
}

pub async fn http_post_edit(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(user): Extension<User>,
    Form(form): Form<PostForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = DbId::from(id);
    let post = match state.store.post_by_id(&id).await? {
        Some(post) => post,
        None => return Ok(ApiError::not_found().into_response()),
    };

    match posts::edit(state.store.as_ref(), &user, &post, form).await? {
        EditOutcome::Updated(_) | EditOutcome::NotAuthor => {
            Ok(Redirect::to(&detail_url(&id)).into_response())
        }
        EditOutcome::Invalid(errors) => Ok(errors.into_response()),
    }
}

pub async fn http_post_delete(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let id = DbId::from(id);
    let post = match state.store.post_by_id(&id).await? {
        Some(post) => post,
        None => return Ok(ApiError::not_found().into_response()),
    };

    match posts::delete(state.store.as_ref(), &user, &post).await? {
        DeleteOutcome::Deleted => Ok(Redirect::to(&profile_url(&user)).into_response()),
        DeleteOutcome::NotAuthor => Ok(Redirect::to(&detail_url(&id)).into_response()),
    }
}

pub async fn http_post_comment(
    state: State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(user): Extension<User>,
    Form(form): Form<CommentForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = DbId::from(id);
    let post = match state.store.post_by_id(&id).await? {
        Some(post) => post,
        None => return Ok(ApiError::not_found().into_response()),
    };

    comments::add(state.store.as_ref(), &user, &post, form).await?;
    Ok(Redirect::to(&detail_url(&id)).into_response())
}

pub fn posts(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(http_get_index))
        .route(
            "/create/",
            get(http_get_create.layer(from_fn_with_state(Arc::clone(state), login_required)))
                .post(http_post_create.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
        .route("/posts/:id/", get(http_get_detail))
        .route(
            "/posts/:id/edit/",
            get(http_get_edit.layer(from_fn_with_state(Arc::clone(state), login_required)))
                .post(http_post_edit.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
        .route(
            "/posts/:id/delete/",
            post(http_post_delete.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
        .route(
            "/posts/:id/comment/",
            post(http_post_comment.layer(from_fn_with_state(Arc::clone(state), login_required))),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use db::{
        models::{Comment, Group, Post, PostFilter},
        Store,
    };

    use super::super::test_utils::{encode, json, location, TestApp};

    async fn count_posts(app: &TestApp) -> i64 {
        app.store.count_posts(&PostFilter::All).await.unwrap()
    }

    async fn group(app: &TestApp, slug: &str) -> Group {
        app.store
            .create_group(Group::new(
                format!("Group {slug}"),
                slug.to_string(),
                "Description".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn post(app: &TestApp, author: &db::models::User, text: &str) -> Post {
        app.store
            .create_post(Post::new(author.id.clone(), None, text.to_string(), None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn anonymous_mutations_go_to_login() {
        let app = TestApp::new(10);
        let (author, _) = app.user("author").await;
        let existing = post(&app, &author, "Existing").await;
        let posts_before = count_posts(&app).await;

        let response = app.post_form("/create/", None, "text=Hello").await;
        assert_eq!(location(&response), "/auth/login/?next=%2Fcreate%2F");

        let edit = format!("/posts/{}/edit/", existing.id);
        let response = app.post_form(&edit, None, "text=Changed").await;
        assert_eq!(
            location(&response),
            format!("/auth/login/?next={}", encode(&edit))
        );

        let delete = format!("/posts/{}/delete/", existing.id);
        let response = app.post_form(&delete, None, "").await;
        assert_eq!(
            location(&response),
            format!("/auth/login/?next={}", encode(&delete))
        );

        let comment = format!("/posts/{}/comment/", existing.id);
        let response = app.post_form(&comment, None, "text=Hi").await;
        assert_eq!(
            location(&response),
            format!("/auth/login/?next={}", encode(&comment))
        );

        assert_eq!(count_posts(&app).await, posts_before);
        let unchanged = app.store.post_by_id(&existing.id).await.unwrap().unwrap();
        assert_eq!(unchanged.text, "Existing");
        assert!(app.store.comments(&existing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_post_in_group() {
        let app = TestApp::new(10);
        let (author, session) = app.user("author").await;
        let group = group(&app, "test-slug").await;
        let posts_before = count_posts(&app).await;

        let form = format!("text={}&group={}", encode("Тестовый текст"), group.id);
        let response = app.post_form("/create/", Some(&session), &form).await;
        assert_eq!(location(&response), "/profile/author/");

        assert_eq!(count_posts(&app).await, posts_before + 1);
        let created = app
            .store
            .posts(
                &PostFilter::Author(author.id.clone()),
                &app_window(&app).await,
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].post.text, "Тестовый текст");
        assert_eq!(created[0].post.group_id, Some(group.id.clone()));
        assert_eq!(created[0].post.author_id, author.id);
    }

    async fn app_window(app: &TestApp) -> db::pagination::PageWindow {
        let count = count_posts(app).await;
        db::pagination::Paginator::new(100).window(count, None)
    }

    #[tokio::test]
    async fn create_rejects_invalid_form() {
        let app = TestApp::new(10);
        let (_, session) = app.user("author").await;

        let response = app
            .post_form("/create/", Some(&session), "text=&group=missing")
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert!(body["errors"]["text"].is_array());
        assert!(body["errors"]["group"].is_array());
        assert_eq!(count_posts(&app).await, 0);
    }

    #[tokio::test]
    async fn create_form_lists_groups() {
        let app = TestApp::new(10);
        let (_, session) = app.user("author").await;
        group(&app, "b-group").await;
        group(&app, "a-group").await;

        let body = json(app.get("/create/", Some(&session)).await).await;
        assert_eq!(body["is_edit"], false);
        assert_eq!(body["groups"][0]["slug"], "a-group");
        assert_eq!(body["groups"][1]["slug"], "b-group");
    }

    #[tokio::test]
    async fn author_edits_post() {
        let app = TestApp::new(10);
        let (author, session) = app.user("author").await;
        let first = group(&app, "first").await;
        let second = group(&app, "second").await;
        let post = app
            .store
            .create_post(Post::new(
                author.id.clone(),
                Some(first.id.clone()),
                "Before".to_string(),
                Some("posts/cat.png".to_string()),
            ))
            .await
            .unwrap();

        let form_page = json(
            app.get(&format!("/posts/{}/edit/", post.id), Some(&session))
                .await,
        )
        .await;
        assert_eq!(form_page["is_edit"], true);
        assert_eq!(form_page["post"]["text"], "Before");

        let form = format!("text=After&group={}", second.id);
        let response = app
            .post_form(&format!("/posts/{}/edit/", post.id), Some(&session), &form)
            .await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));

        let edited = app.store.post_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(edited.text, "After");
        assert_eq!(edited.group_id, Some(second.id));
        assert_eq!(edited.image.as_deref(), Some("posts/cat.png"));
    }

    #[tokio::test]
    async fn other_user_cannot_edit() {
        let app = TestApp::new(10);
        let (author, _) = app.user("author").await;
        let (_, intruder) = app.user("intruder").await;
        let post = post(&app, &author, "Original").await;

        let response = app
            .get(&format!("/posts/{}/edit/", post.id), Some(&intruder))
            .await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));

        let response = app
            .post_form(
                &format!("/posts/{}/edit/", post.id),
                Some(&intruder),
                "text=Hijacked",
            )
            .await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));

        let unchanged = app.store.post_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(unchanged, post);
    }

    #[tokio::test]
    async fn only_author_deletes() {
        let app = TestApp::new(10);
        let (author, session) = app.user("author").await;
        let (_, intruder) = app.user("intruder").await;
        let post = post(&app, &author, "Doomed").await;
        app.store
            .create_comment(Comment::new(
                post.id.clone(),
                author.id.clone(),
                "comment".to_string(),
            ))
            .await
            .unwrap();

        let delete = format!("/posts/{}/delete/", post.id);
        let response = app.post_form(&delete, Some(&intruder), "").await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));
        assert!(app.store.post_by_id(&post.id).await.unwrap().is_some());

        let response = app.post_form(&delete, Some(&session), "").await;
        assert_eq!(location(&response), "/profile/author/");
        assert!(app.store.post_by_id(&post.id).await.unwrap().is_none());
        assert!(app.store.comments(&post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_attach_to_post() {
        let app = TestApp::new(10);
        let (author, _) = app.user("author").await;
        let (reader, session) = app.user("reader").await;
        let post = post(&app, &author, "Commented").await;

        let comment = format!("/posts/{}/comment/", post.id);
        let response = app.post_form(&comment, Some(&session), "text=Nice").await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));

        let response = app.post_form(&comment, Some(&session), "text=").await;
        assert_eq!(location(&response), format!("/posts/{}/", post.id));

        let comments = app.store.comments(&post.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment.text, "Nice");
        assert_eq!(comments[0].author.id, reader.id);

        let detail = json(app.get(&format!("/posts/{}/", post.id), None).await).await;
        assert_eq!(detail["comment_count"], 1);
        assert_eq!(detail["comments"][0]["text"], "Nice");
        assert_eq!(detail["post_title"], "Commented");
        assert_eq!(detail["posts_count"], 1);
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let app = TestApp::new(10);
        let (_, session) = app.user("author").await;

        let response = app.get("/posts/missing/", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"], "Record not found");

        for uri in [
            "/posts/missing/edit/",
            "/posts/missing/delete/",
            "/posts/missing/comment/",
        ] {
            let response = app.post_form(uri, Some(&session), "text=x").await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn index_is_paginated_and_cached() {
        let app = TestApp::new(3);
        let (author, _) = app.user("author").await;
        for n in 0..7 {
            post(&app, &author, &format!("post {n}")).await;
        }

        let response = app.get("/", None).await;
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=20"
        );
        let body = json(response).await;
        assert_eq!(body["page"]["num_pages"], 3);
        assert_eq!(body["page"]["count"], 7);
        assert_eq!(body["page"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(body["page"]["items"][0]["text"], "post 6");

        let body = json(app.get("/?page=3", None).await).await;
        assert_eq!(body["page"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["page"]["items"][0]["text"], "post 0");
        assert_eq!(body["page"]["has_next"], false);

        let body = json(app.get("/?page=99", None).await).await;
        assert_eq!(body["page"]["number"], 3);

        let body = json(app.get("/?page=abc", None).await).await;
        assert_eq!(body["page"]["number"], 1);
    }
}
