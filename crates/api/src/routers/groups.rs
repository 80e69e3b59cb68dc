use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use db::pagination::PaginationQuery;
use web::{errors::AppError, AppState};

use crate::{
    common::listings,
    entities::{GroupListingView, GroupView},
    error::ApiError,
};

pub async fn http_get_groups(state: State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let groups = state.store.groups().await?;
    Ok(Json(
        groups.into_iter().map(GroupView::new).collect::<Vec<_>>(),
    ))
}

pub async fn http_get_group(
    state: State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let listing =
        listings::group_posts(state.store.as_ref(), &state.paginator(), &slug, query.page())
            .await?;
    match listing {
        Some(listing) => Ok(Json(GroupListingView::from(listing)).into_response()),
        None => Ok(ApiError::not_found().into_response()),
    }
}

pub fn groups() -> Router<Arc<AppState>> {
    Router::new()
        .route("/group/", get(http_get_groups))
        .route("/group/:slug/", get(http_get_group))
}
