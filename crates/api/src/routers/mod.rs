pub mod auth;
pub mod groups;
pub mod posts;
pub mod profiles;

use std::sync::Arc;

use axum::Router;
use web::AppState;

pub fn api(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(posts::posts(&state))
        .merge(groups::groups())
        .merge(profiles::profiles(&state))
        .merge(auth::auth())
}
