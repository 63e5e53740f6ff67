use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};

use crate::error::ServiceError;
use crate::models::MonitorRule;
use crate::AppState;

/// Threshold fields of a rule save; validated at the HTTP boundary
/// (at least one threshold, push_time shaped "HH:mm").
#[derive(Debug, Clone)]
pub struct RuleInput {
    pub rule_name: String,
    pub rise_threshold: Option<f64>,
    pub net_worth_threshold: Option<f64>,
    pub push_time: Option<String>,
}

/// Save a rule.
///
/// With an explicit id this updates that row (scoped to the user). Without
/// one it upserts on `(user_id, fund_code)` under the unique index, so
/// repeated saves can never pile up duplicate rows.
pub async fn save_rule(
    state: &AppState,
    user_id: &str,
    fund_code: &str,
    input: RuleInput,
    rule_id: Option<ObjectId>,
) -> Result<MonitorRule, ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");
    let now = Utc::now().timestamp();

    let fields = doc! {
        "rule_name": input.rule_name.clone(),
        "rise_threshold": input.rise_threshold,
        "net_worth_threshold": input.net_worth_threshold,
        "push_time": input.push_time.clone(),
        "updated_at": now,
    };

    let opts = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .upsert(rule_id.is_none())
        .build();

    let filter = match rule_id {
        Some(id) => doc! { "_id": id, "user_id": user_id },
        None => doc! { "user_id": user_id, "fund_code": fund_code },
    };

    let update = doc! {
        "$set": fields,
        "$setOnInsert": { "created_at": now },
    };

    let saved = rules
        .find_one_and_update(filter, update, opts)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(saved)
}

pub async fn get_rule(
    state: &AppState,
    user_id: &str,
    rule_id: ObjectId,
) -> Result<MonitorRule, ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");

    rules
        .find_one(doc! { "_id": rule_id, "user_id": user_id }, None)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// All rules for one of the user's funds, newest first.
pub async fn list_fund_rules(
    state: &AppState,
    user_id: &str,
    fund_code: &str,
) -> Result<Vec<MonitorRule>, ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = rules
        .find(doc! { "user_id": user_id, "fund_code": fund_code }, find_opts)
        .await?;

    let mut items: Vec<MonitorRule> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res?);
    }

    Ok(items)
}

pub async fn delete_rule(
    state: &AppState,
    user_id: &str,
    rule_id: ObjectId,
) -> Result<(), ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");

    rules
        .delete_one(doc! { "_id": rule_id, "user_id": user_id }, None)
        .await?;

    Ok(())
}

/// Rules due for scheduled delivery: configured for this HH:mm and not yet
/// pushed today. `$ne` also matches rules that have never been pushed.
pub async fn due_rules(
    state: &AppState,
    hhmm: &str,
    today: &str,
) -> Result<Vec<MonitorRule>, ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");

    let mut cursor = rules
        .find(
            doc! { "push_time": hhmm, "last_pushed_on": { "$ne": today } },
            None,
        )
        .await?;

    let mut items: Vec<MonitorRule> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res?);
    }

    Ok(items)
}

pub async fn mark_pushed(
    state: &AppState,
    rule_id: ObjectId,
    today: &str,
) -> Result<(), ServiceError> {
    let rules = state.db.collection::<MonitorRule>("rules");

    rules
        .update_one(
            doc! { "_id": rule_id },
            doc! { "$set": { "last_pushed_on": today } },
            None,
        )
        .await?;

    Ok(())
}
