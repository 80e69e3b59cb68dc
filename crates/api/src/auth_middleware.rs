use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use db::models::User;
use url::form_urlencoded;
use web::{errors::AppError, AppState};

pub const TOKEN_COOKIE: &str = "token";

/// Resolves the user behind the session cookie, if any.
pub async fn viewer(state: &AppState, jar: &CookieJar) -> anyhow::Result<Option<User>> {
    let token = match jar.get(TOKEN_COOKIE) {
        Some(token) => token.value().to_string(),
        None => return Ok(None),
    };

    match state.store.session_by_token(&token).await? {
        Some(session) => state.store.user_by_id(&session.user_id).await,
        None => Ok(None),
    }
}

pub fn login_redirect(login_url: &str, next: &str) -> String {
    let next: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{login_url}?next={next}")
}

/// Lets the request through with an `Extension<User>`, or sends the client to
/// the login flow with the requested path as `next`.
pub async fn login_required<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    if let Some(user) = viewer(&state, &jar).await? {
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");
    log::debug!("Anonymous request to {}, redirecting to login", target);
    Ok(Redirect::to(&login_redirect(&state.config.web.login_url, target)).into_response())
}

/// Inserts an `Extension<Option<User>>`; anonymous requests get `None`.
pub async fn optional_login<B>(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let user = viewer(&state, &jar).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
