use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A favorite or monitor relationship between a user and a fund.
///
/// At most one link per `(user_id, fund_code)` per collection, enforced by a
/// unique compound index (see `services::db_init`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundLink {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // opaque external identity from the auth provider
    pub user_id: String,
    pub fund_code: String,

    pub created_at: i64,
}
