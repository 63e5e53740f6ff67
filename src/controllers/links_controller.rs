use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ServiceError;
use crate::models::CurrentUser;
use crate::services::fund_list;
use crate::services::links_service::{self, AddOutcome, LinkKind};
use crate::AppState;

async fn add_link(
    state: &AppState,
    kind: LinkKind,
    user: Option<Extension<CurrentUser>>,
    code: String,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    let code = code.trim().to_string();
    if code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "fund code is required" })),
        )
            .into_response();
    }

    // Reject codes the directory does not know. Skipped while the directory
    // is unavailable (empty) so an upstream outage does not block writes.
    let directory = fund_list::cached_directory(state).await;
    if !directory.is_empty() && !directory.iter().any(|e| e.code == code) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "unknown fund code" })),
        )
            .into_response();
    }

    match links_service::add(state, kind, &u.id, &code).await {
        Ok(AddOutcome::Added) => (
            StatusCode::CREATED,
            Json(json!({ "status": "added", "fundCode": code })),
        )
            .into_response(),
        Ok(AddOutcome::AlreadyExists) => (
            StatusCode::OK,
            Json(json!({ "status": "alreadyExists", "message": "already in list" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn remove_link(
    state: &AppState,
    kind: LinkKind,
    user: Option<Extension<CurrentUser>>,
    code: String,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    // removing an absent link is a no-op success
    match links_service::remove(state, kind, &u.id, code.trim()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "removed" }))).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_links(
    state: &AppState,
    kind: LinkKind,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    match links_service::list(state, kind, &u.id).await {
        Ok(links) => {
            let items: Vec<_> = links
                .into_iter()
                .map(|l| {
                    json!({
                        "fundCode": l.fund_code,
                        "createdAt": l.created_at,
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

// ---------------- Favorites ----------------

// POST /favorites/:code
pub async fn post_add_favorite(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    add_link(&state, LinkKind::Favorite, user, code).await
}

// DELETE /favorites/:code
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    remove_link(&state, LinkKind::Favorite, user, code).await
}

// GET /favorites
pub async fn get_favorites(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    list_links(&state, LinkKind::Favorite, user).await
}

// ---------------- Monitors ----------------

// POST /monitors/:code
pub async fn post_add_monitor(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    add_link(&state, LinkKind::Monitor, user, code).await
}

// DELETE /monitors/:code
pub async fn delete_monitor(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    remove_link(&state, LinkKind::Monitor, user, code).await
}

// GET /monitors
pub async fn get_monitors(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    list_links(&state, LinkKind::Monitor, user).await
}
