use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;
use crate::models::CurrentUser;
use crate::services::alert_evaluator;
use crate::AppState;

#[derive(Deserialize)]
pub struct PushNowBody {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
}

// POST /monitors/:code/push
//
// On-demand report: evaluates the rule against live data and always pushes
// the resulting status message; `triggered` tells the caller whether a
// threshold actually crossed.
pub async fn post_push_now(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<PushNowBody>,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    let rule_id = match ObjectId::parse_str(&body.rule_id) {
        Ok(x) => x,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "bad rule id" })),
            )
                .into_response()
        }
    };

    match alert_evaluator::evaluate_and_notify(&state, &u.id, code.trim(), rule_id).await {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(e) => e.into_response(),
    }
}
