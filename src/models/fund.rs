use serde::{Deserialize, Serialize};

/// One fund's point-in-time snapshot as served to the client.
///
/// Built fresh per request from upstream data, never persisted. Numeric
/// fields default to `0.0` when upstream omits them; `incomplete` records
/// that something actually was missing so the UI can tell a true zero from
/// absent data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRecord {
    pub id: String,
    pub code: String,
    pub name: String,

    #[serde(rename = "shortName")]
    pub short_name: String,

    // category label, possibly empty
    #[serde(rename = "type")]
    pub kind: String,

    // prior-day settled NAV
    #[serde(rename = "netWorth")]
    pub net_worth: f64,

    // intraday estimated NAV
    #[serde(rename = "expectWorth")]
    pub expect_worth: f64,

    // cumulative NAV including distributions
    #[serde(rename = "totalNetWorth")]
    pub total_net_worth: f64,

    // estimated day percent change
    #[serde(rename = "expectGrowth")]
    pub expect_growth: f64,

    #[serde(rename = "actualDayGrowth")]
    pub actual_day_growth: f64,

    // always derived: expect_worth - net_worth
    #[serde(rename = "estimatedChange")]
    pub estimated_change: f64,

    #[serde(rename = "netWorthDate")]
    pub net_worth_date: String,

    #[serde(rename = "expectWorthDate")]
    pub expect_worth_date: String,

    // size of the filtered universe this record was paginated from
    #[serde(rename = "totalCount")]
    pub total_count: usize,

    // true when the NAV fetch failed or a field did not parse
    #[serde(rename = "dataIncomplete")]
    pub incomplete: bool,
}

/// A `FundRecord` annotated with the requesting user's relationship flags.
/// The flags are annotations added by reconciliation, not part of the
/// canonical record.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedFundRecord {
    #[serde(flatten)]
    pub record: FundRecord,

    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,

    #[serde(rename = "isMonitoring")]
    pub is_monitoring: bool,
}
