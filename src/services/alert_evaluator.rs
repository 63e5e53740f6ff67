use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::error::ServiceError;
use crate::models::MonitorRule;
use crate::services::gateway::FundDetail;
use crate::services::rules_service;
use crate::AppState;

/// Outcome of checking one fund snapshot against one rule.
///
/// A message is rendered whether or not anything triggered: the push
/// endpoint is an on-demand status report, a non-trigger changes the body,
/// not the delivery.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    #[serde(rename = "netWorthTriggered")]
    pub net_worth_triggered: bool,

    #[serde(rename = "riseTriggered")]
    pub rise_triggered: bool,

    pub triggered: bool,

    pub message: String,
}

/// Stateless threshold check + markdown rendering.
pub fn evaluate(detail: &FundDetail, rule: &MonitorRule) -> Evaluation {
    let net_worth_triggered = rule
        .net_worth_threshold
        .map_or(false, |t| detail.net_worth >= t);

    let rise_triggered = rule
        .rise_threshold
        .map_or(false, |t| detail.actual_day_growth.abs() >= t);

    let triggered = net_worth_triggered || rise_triggered;

    let mut lines = vec![
        format!("### {} ({})", detail.name, detail.code),
        String::new(),
        format!("- net worth: {} ({})", detail.net_worth, detail.net_worth_date),
        format!("- day growth: {}%", detail.actual_day_growth),
        format!("- estimated worth: {}", detail.expect_worth),
        String::new(),
        format!("rule: {}", rule.rule_name),
    ];

    match rule.net_worth_threshold {
        Some(t) if net_worth_triggered => {
            lines.push(format!("- net worth threshold {t}: **reached**"));
        }
        Some(t) => lines.push(format!("- net worth threshold {t}: not reached")),
        None => {}
    }

    match rule.rise_threshold {
        Some(t) if rise_triggered => {
            lines.push(format!(
                "- rise threshold {t}: **reached** (|{}| >= {t})",
                detail.actual_day_growth
            ));
        }
        Some(t) => lines.push(format!("- rise threshold {t}: not reached")),
        None => {}
    }

    lines.push(String::new());
    if triggered {
        lines.push("**threshold crossed**".to_string());
    } else {
        lines.push("no threshold crossed, status report only".to_string());
    }

    Evaluation {
        net_worth_triggered,
        rise_triggered,
        triggered,
        message: lines.join("\n"),
    }
}

/// Fetch the live detail for the rule's fund, evaluate, push the report.
///
/// A failed detail fetch aborts the whole evaluation; there is no fallback
/// to stale data.
pub async fn evaluate_and_notify(
    state: &AppState,
    user_id: &str,
    fund_code: &str,
    rule_id: ObjectId,
) -> Result<Evaluation, ServiceError> {
    let rule = rules_service::get_rule(state, user_id, rule_id).await?;

    if rule.fund_code != fund_code {
        return Err(ServiceError::NotFound);
    }

    let detail = state.gateway.fund_detail(fund_code).await.map_err(|e| {
        ServiceError::RuleEvaluation(format!("live snapshot unavailable: {e}"))
    })?;

    let evaluation = evaluate(&detail, &rule);

    let title = format!("Fund alert: {}", detail.name);
    state
        .gateway
        .push_markdown(&title, &evaluation.message)
        .await?;

    Ok(evaluation)
}
