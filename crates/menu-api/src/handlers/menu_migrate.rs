// ============================================================================
// Menu API - Menu Migrate Handlers
// File: crates/menu-api/src/handlers/menu_migrate.rs
// ============================================================================
//! Menu list, export download and import upload handlers

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use tracing::info;

use menu_core::domain::{ImportResult, Manifest, MenuNode, UserId};
use menu_core::repositories::MenuRepository;
use menu_core::DomainError;
use menu_shared::constants::{SYSTEM_USER_ID, USER_ID_HEADER};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// List handler - GET /admin/menu-migrate/list
pub async fn list<R: MenuRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Json<ApiResponse<Vec<MenuNode>>>, ApiError> {
    let menus = state.service.list_menus().await?;
    Ok(Json(ApiResponse::success(menus)))
}

/// Export handler - GET /admin/menu-migrate/export
///
/// Responds with the manifest as a JSON file attachment.
pub async fn export<R: MenuRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Response, ApiError> {
    let manifest = state.service.export_menus().await?;
    let body = manifest.to_pretty_json()?;
    let file_name = Manifest::file_name(Local::now().naive_local());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate".to_string()),
        ],
        body,
    )
        .into_response())
}

/// Import handler - POST /admin/menu-migrate/import
///
/// Multipart fields: `file` (a `.json` manifest) and optional `overwrite`.
pub async fn import<R: MenuRepository + 'static>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImportResult>>, ApiError> {
    let user_id = acting_user(&headers)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut overwrite = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                upload = Some((file_name, content.to_vec()));
            }
            "overwrite" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                overwrite = parse_flag(&raw)?;
            }
            _ => {}
        }
    }

    let (file_name, content) = upload
        .ok_or_else(|| ApiError::BadRequest("Please upload a valid JSON file".to_string()))?;

    if !file_name.to_ascii_lowercase().ends_with(".json") {
        return Err(ApiError::BadRequest("Only JSON files are supported".to_string()));
    }
    if content.len() > state.max_upload_bytes {
        return Err(DomainError::ManifestTooLarge { limit: state.max_upload_bytes }.into());
    }

    info!("Menu import upload '{}' ({} bytes) by user {}", file_name, content.len(), user_id);

    let result = state.service.import_bytes(&content, overwrite, user_id).await?;
    Ok(Json(ApiResponse::success_with_message(result, "Menu import finished")))
}

/// Acting user for audit columns. Authentication sits in front of this
/// service and forwards the user id in a header.
fn acting_user(headers: &HeaderMap) -> Result<UserId, ApiError> {
    match headers.get(USER_ID_HEADER) {
        None => Ok(SYSTEM_USER_ID),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<UserId>().ok())
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} header", USER_ID_HEADER))),
    }
}

fn parse_flag(raw: &str) -> Result<bool, ApiError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(ApiError::BadRequest(format!(
            "overwrite must be a boolean, got '{}'",
            other
        ))),
    }
}
