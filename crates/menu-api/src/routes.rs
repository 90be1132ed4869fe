//! Router assembly

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use menu_core::repositories::MenuRepository;

use crate::handlers::{health, menu_migrate};
use crate::state::AppState;

// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router<R: MenuRepository + 'static>(state: AppState<R>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/admin/menu-migrate/list", get(menu_migrate::list::<R>))
        .route("/admin/menu-migrate/export", get(menu_migrate::export::<R>))
        .route("/admin/menu-migrate/import", post(menu_migrate::import::<R>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
