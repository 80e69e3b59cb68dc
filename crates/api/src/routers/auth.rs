use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use web::{errors::AppError, AppState};

use crate::{auth_middleware::TOKEN_COOKIE, common::users, error::ApiError};

#[derive(Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Serialize)]
pub struct LoginView {
    next: String,
}

/// Only local paths are accepted as a target after login.
fn safe_next(next: Option<String>) -> String {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => String::from("/"),
    }
}

pub async fn http_get_login(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    Json(LoginView {
        next: safe_next(query.next),
    })
}

#[derive(Deserialize)]
pub struct LoginBody {
    username: String,
    password: String,
    next: Option<String>,
}

pub async fn http_post_login(
    state: State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let next = safe_next(body.next);

    let user = match users::authenticate(&body.username, body.password, state.store.as_ref()).await? {
        Some(user) => user,
        None => {
            return Ok(ApiError::new_with_description(
                "invalid_grant",
                "Invalid username or password",
                StatusCode::UNAUTHORIZED,
            )
            .into_response());
        }
    };

    let session = state.store.create_session(&user.id).await?;
    log::debug!("{} logged in", user.name);

    Ok((
        jar.add(
            Cookie::build(TOKEN_COOKIE, session.token)
                .path("/")
                .secure(state.config.web.secure_cookies)
                .http_only(true)
                .finish(),
        ),
        Redirect::to(&next),
    )
        .into_response())
}

pub async fn http_post_logout(
    state: State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = jar.get(TOKEN_COOKIE) {
        state.store.delete_session(token.value()).await?;
    }

    Ok((
        jar.remove(Cookie::build(TOKEN_COOKIE, "").path("/").finish()),
        Redirect::to("/"),
    ))
}

pub fn auth() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/", get(http_get_login).post(http_post_login))
        .route("/auth/logout/", post(http_post_logout))
}
