use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;
use crate::models::CurrentUser;
use crate::services::{fund_list, reconcile};
use crate::AppState;

const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,

    // comma-separated substring lists
    pub allow: Option<String>,
    pub deny: Option<String>,
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
}

fn split_filter_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

// GET /funds
pub async fn get_funds(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);

    // the aggregator trusts its inputs; this is where sane values are enforced
    if page < 1 {
        return bad_request("page must be >= 1");
    }
    if limit < 1 || limit > MAX_LIMIT {
        return bad_request("limit must be between 1 and 100");
    }

    let allow = split_filter_list(query.allow);
    let deny = split_filter_list(query.deny);

    let fund_page = fund_list::list(&state, page, limit, &allow, &deny).await;

    let user_ref = user.as_ref().map(|Extension(u)| u);
    let annotated = match reconcile::annotate_for_user(&state, fund_page.data, user_ref).await {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };

    (
        StatusCode::OK,
        Json(json!({
            "data": annotated,
            "total": fund_page.total,
            "page": fund_page.page,
            "limit": fund_page.limit,
        })),
    )
        .into_response()
}

// GET /funds/:code
pub async fn get_fund(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    let code = code.trim().to_string();
    if code.is_empty() {
        return bad_request("fund code is required");
    }

    // An unknown code is only distinguishable while the directory is warm;
    // with an empty directory the NAV fetch decides.
    let directory = fund_list::cached_directory(&state).await;
    if !directory.is_empty() && !directory.iter().any(|e| e.code == code) {
        return ServiceError::NotFound.into_response();
    }

    match state.fund_source.fetch_nav(&code).await {
        Some(snap) => (
            StatusCode::OK,
            Json(json!({
                "code": snap.code,
                "name": snap.name,
                "netWorth": snap.net_worth,
                "expectWorth": snap.expect_worth,
                "expectGrowth": snap.expect_growth,
                "estimatedChange": snap.estimated_change,
                "netWorthDate": snap.net_worth_date,
                "expectWorthDate": snap.expect_worth_date,
                "dataIncomplete": snap.incomplete,
            })),
        )
            .into_response(),
        None => ServiceError::UpstreamUnavailable("nav fetch failed".to_string()).into_response(),
    }
}
