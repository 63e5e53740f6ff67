use std::collections::HashSet;

use crate::error::ServiceError;
use crate::models::{AnnotatedFundRecord, CurrentUser, FundRecord};
use crate::services::links_service::{self, LinkKind};
use crate::AppState;

/// Annotate a page of records with membership in the two code sets.
/// Pure merge, O(page + links); the records themselves are not mutated
/// beyond the wrapping.
pub fn annotate(
    records: Vec<FundRecord>,
    favorites: &HashSet<String>,
    monitors: &HashSet<String>,
) -> Vec<AnnotatedFundRecord> {
    records
        .into_iter()
        .map(|record| {
            let is_favorite = favorites.contains(&record.code);
            let is_monitoring = monitors.contains(&record.code);
            AnnotatedFundRecord {
                record,
                is_favorite,
                is_monitoring,
            }
        })
        .collect()
}

/// Build the user's favorite/monitor sets and annotate.
/// An anonymous caller gets all-false flags, not an error.
pub async fn annotate_for_user(
    state: &AppState,
    records: Vec<FundRecord>,
    user: Option<&CurrentUser>,
) -> Result<Vec<AnnotatedFundRecord>, ServiceError> {
    let (favorites, monitors) = match user {
        Some(u) => (
            links_service::code_set(state, LinkKind::Favorite, &u.id).await?,
            links_service::code_set(state, LinkKind::Monitor, &u.id).await?,
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    Ok(annotate(records, &favorites, &monitors))
}
