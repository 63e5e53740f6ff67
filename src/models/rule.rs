use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One user's alert configuration for one fund.
///
/// A rule is meaningful only with at least one threshold set; the HTTP
/// boundary rejects saves where both are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorRule {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: String,
    pub fund_code: String,

    pub rule_name: String,

    // trigger when |day growth %| >= this
    pub rise_threshold: Option<f64>,

    // trigger when settled NAV >= this
    pub net_worth_threshold: Option<f64>,

    // daily delivery time, "HH:mm"
    pub push_time: Option<String>,

    // "YYYY-MM-DD" of the last scheduled delivery, guards one push per day
    #[serde(default)]
    pub last_pushed_on: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}
