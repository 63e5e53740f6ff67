use std::collections::HashSet;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::error::ServiceError;
use crate::models::FundLink;
use crate::AppState;

/// The two user-fund relationship kinds, stored in separate collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Favorite,
    Monitor,
}

impl LinkKind {
    pub fn collection(self) -> &'static str {
        match self {
            LinkKind::Favorite => "favorites",
            LinkKind::Monitor => "monitors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// The unique `(user_id, fund_code)` index turns a concurrent double-add
/// into a duplicate-key error instead of a second row; that error is the
/// "already in list" signal, there is no check-then-insert window.
pub fn is_duplicate_key(msg: &str) -> bool {
    msg.contains("E11000")
}

pub async fn add(
    state: &AppState,
    kind: LinkKind,
    user_id: &str,
    fund_code: &str,
) -> Result<AddOutcome, ServiceError> {
    let links = state.db.collection::<FundLink>(kind.collection());

    let link = FundLink {
        id: ObjectId::new(),
        user_id: user_id.to_string(),
        fund_code: fund_code.to_string(),
        created_at: Utc::now().timestamp(),
    };

    match links.insert_one(&link, None).await {
        Ok(_) => Ok(AddOutcome::Added),
        Err(e) if is_duplicate_key(&e.to_string()) => Ok(AddOutcome::AlreadyExists),
        Err(e) => Err(ServiceError::Db(e.to_string())),
    }
}

/// Unconditional delete; removing a link that does not exist is a success.
pub async fn remove(
    state: &AppState,
    kind: LinkKind,
    user_id: &str,
    fund_code: &str,
) -> Result<(), ServiceError> {
    let links = state.db.collection::<FundLink>(kind.collection());

    links
        .delete_one(doc! { "user_id": user_id, "fund_code": fund_code }, None)
        .await?;

    Ok(())
}

/// All of one user's links, newest first ("favorited since" display data).
pub async fn list(
    state: &AppState,
    kind: LinkKind,
    user_id: &str,
) -> Result<Vec<FundLink>, ServiceError> {
    let links = state.db.collection::<FundLink>(kind.collection());

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = links.find(doc! { "user_id": user_id }, find_opts).await?;

    let mut items: Vec<FundLink> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res?);
    }

    Ok(items)
}

pub async fn exists(
    state: &AppState,
    kind: LinkKind,
    user_id: &str,
    fund_code: &str,
) -> Result<bool, ServiceError> {
    let links = state.db.collection::<FundLink>(kind.collection());

    let found = links
        .find_one(doc! { "user_id": user_id, "fund_code": fund_code }, None)
        .await?;

    Ok(found.is_some())
}

/// The user's linked fund codes as a lookup set for reconciliation.
pub async fn code_set(
    state: &AppState,
    kind: LinkKind,
    user_id: &str,
) -> Result<HashSet<String>, ServiceError> {
    let items = list(state, kind, user_id).await?;
    Ok(items.into_iter().map(|l| l.fund_code).collect())
}
