use std::time::Duration;

use chrono::Local;
use tokio::time;

use crate::services::{alert_evaluator, rules_service};
use crate::AppState;

/// Background delivery of scheduled rule reports.
///
/// Every minute, rules whose `push_time` equals the current HH:mm and which
/// have not been pushed today are evaluated and pushed. One failing rule
/// does not stop the tick, and a failed tick does not stop the loop.
pub fn spawn_push_scheduler(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(60));

        loop {
            interval.tick().await;

            if let Err(e) = run_tick(&state).await {
                tracing::warn!(error = %e, "push scheduler tick failed");
            }
        }
    });
}

async fn run_tick(state: &AppState) -> Result<(), String> {
    let now = Local::now();
    let hhmm = now.format("%H:%M").to_string();
    let today = now.format("%Y-%m-%d").to_string();

    let due = rules_service::due_rules(state, &hhmm, &today)
        .await
        .map_err(|e| e.to_string())?;

    if due.is_empty() {
        return Ok(());
    }

    tracing::info!(count = due.len(), time = %hhmm, "delivering scheduled rule reports");

    for rule in due {
        // marked before pushing: a failed push is skipped, not retried, today
        if let Err(e) = rules_service::mark_pushed(state, rule.id, &today).await {
            tracing::warn!(rule = %rule.id, error = %e, "could not mark rule pushed");
            continue;
        }

        match alert_evaluator::evaluate_and_notify(state, &rule.user_id, &rule.fund_code, rule.id)
            .await
        {
            Ok(ev) => {
                tracing::info!(rule = %rule.id, fund = %rule.fund_code, triggered = ev.triggered, "scheduled report delivered");
            }
            Err(e) => {
                tracing::warn!(rule = %rule.id, fund = %rule.fund_code, error = %e, "scheduled report failed");
            }
        }
    }

    Ok(())
}
