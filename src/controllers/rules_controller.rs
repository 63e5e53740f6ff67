use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::error::ServiceError;
use crate::models::{CurrentUser, MonitorRule};
use crate::services::rules_service::{self, RuleInput};
use crate::AppState;

#[derive(Deserialize)]
pub struct SaveRuleBody {
    #[serde(rename = "ruleName")]
    pub rule_name: Option<String>,

    #[serde(rename = "riseThreshold")]
    pub rise_threshold: Option<f64>,

    #[serde(rename = "netWorthThreshold")]
    pub net_worth_threshold: Option<f64>,

    #[serde(rename = "pushTime")]
    pub push_time: Option<String>,

    #[serde(rename = "ruleId")]
    pub rule_id: Option<String>,
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
}

fn is_valid_push_time(s: &str) -> bool {
    let re = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    re.is_match(s)
}

fn rule_json(rule: &MonitorRule) -> serde_json::Value {
    json!({
        "id": rule.id.to_hex(),
        "fundCode": rule.fund_code,
        "ruleName": rule.rule_name,
        "riseThreshold": rule.rise_threshold,
        "netWorthThreshold": rule.net_worth_threshold,
        "pushTime": rule.push_time,
        "createdAt": rule.created_at,
        "updatedAt": rule.updated_at,
    })
}

// GET /monitors/:code/rules
pub async fn get_rules(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    match rules_service::list_fund_rules(&state, &u.id, code.trim()).await {
        Ok(rules) => {
            let items: Vec<_> = rules.iter().map(rule_json).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

// POST /monitors/:code/rules
pub async fn post_save_rule(
    State(state): State<AppState>,
    Path(code): Path<String>,
    user: Option<Extension<CurrentUser>>,
    Json(body): Json<SaveRuleBody>,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    let code = code.trim().to_string();
    if code.is_empty() {
        return bad_request("fund code is required");
    }

    // a rule without any threshold can never fire
    if body.rise_threshold.is_none() && body.net_worth_threshold.is_none() {
        return bad_request("set at least one of riseThreshold, netWorthThreshold");
    }

    if let Some(t) = body.rise_threshold {
        if !t.is_finite() || t < 0.0 {
            return bad_request("riseThreshold must be a non-negative number");
        }
    }

    if let Some(t) = body.net_worth_threshold {
        if !t.is_finite() || t <= 0.0 {
            return bad_request("netWorthThreshold must be a positive number");
        }
    }

    let push_time = match body.push_time {
        Some(s) => {
            let s = s.trim().to_string();
            if !is_valid_push_time(&s) {
                return bad_request("pushTime must be HH:mm");
            }
            Some(s)
        }
        None => None,
    };

    let rule_id = match body.rule_id {
        Some(raw) => match ObjectId::parse_str(&raw) {
            Ok(id) => Some(id),
            Err(_) => return bad_request("bad rule id"),
        },
        None => None,
    };

    let input = RuleInput {
        rule_name: body
            .rule_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{code} monitor")),
        rise_threshold: body.rise_threshold,
        net_worth_threshold: body.net_worth_threshold,
        push_time,
    };

    match rules_service::save_rule(&state, &u.id, &code, input, rule_id).await {
        Ok(rule) => (StatusCode::OK, Json(rule_json(&rule))).into_response(),
        Err(e) => e.into_response(),
    }
}

// DELETE /monitors/:code/rules/:id
pub async fn delete_rule(
    State(state): State<AppState>,
    Path((_code, id)): Path<(String, String)>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return ServiceError::AuthRequired.into_response();
    };

    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return bad_request("bad rule id"),
    };

    match rules_service::delete_rule(&state, &u.id, oid).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "deleted" }))).into_response(),
        Err(e) => e.into_response(),
    }
}
