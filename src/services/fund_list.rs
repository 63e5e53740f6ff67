use futures_util::future::join_all;
use serde::Serialize;

use crate::models::FundRecord;
use crate::services::cache::DIRECTORY_TTL;
use crate::services::fund_source::{DirectoryEntry, NavSnapshot};
use crate::AppState;

const DIRECTORY_CACHE_KEY: &str = "fund-directory";

/// One filtered, paginated, NAV-enriched page of funds.
#[derive(Debug, Serialize)]
pub struct FundPage {
    pub data: Vec<FundRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Produce one page of the fund list.
///
/// `page` is 1-based; a page past the end yields an empty slice, not an
/// error. The aggregator does not validate `page`/`limit` itself, the HTTP
/// controller does.
pub async fn list(
    state: &AppState,
    page: usize,
    limit: usize,
    allow: &[String],
    deny: &[String],
) -> FundPage {
    let directory = cached_directory(state).await;

    let filtered = apply_filters(directory, allow, deny);
    let total = filtered.len();

    let slice = page_slice(&filtered, page, limit);

    // Fan out the per-fund NAV lookups; the page waits for the slowest but
    // one failed fetch only zero-fills its own record.
    let snapshots = join_all(
        slice
            .iter()
            .map(|entry| state.fund_source.fetch_nav(&entry.code)),
    )
    .await;

    let data = slice
        .iter()
        .zip(snapshots)
        .map(|(entry, snap)| build_record(entry, snap, total))
        .collect();

    FundPage {
        data,
        total,
        page,
        limit,
    }
}

/// The full directory through the 24h cache.
///
/// A failed refresh degrades to an empty directory (warn-logged) instead of
/// failing the page; the failure is not cached, so the next request retries
/// upstream.
pub async fn cached_directory(state: &AppState) -> Vec<DirectoryEntry> {
    if let Some(entries) = state.directory_cache.get(DIRECTORY_CACHE_KEY) {
        return entries;
    }

    match state.fund_source.fetch_directory().await {
        Ok(entries) => {
            tracing::info!(count = entries.len(), "fund directory refreshed");
            state
                .directory_cache
                .set(DIRECTORY_CACHE_KEY, entries.clone(), DIRECTORY_TTL);
            entries
        }
        Err(e) => {
            tracing::warn!(error = %e, "fund directory unavailable, serving empty list");
            Vec::new()
        }
    }
}

/// `"{name} - {type}"`, the string both filter lists match against.
fn description(entry: &DirectoryEntry) -> String {
    format!("{} - {}", entry.name, entry.kind)
}

/// Deny is applied before allow; a fund matching both lists is excluded.
/// Matching is plain case-sensitive substring containment, not tokenized.
pub fn apply_filters(
    entries: Vec<DirectoryEntry>,
    allow: &[String],
    deny: &[String],
) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            let desc = description(entry);

            if deny.iter().any(|d| desc.contains(d.as_str())) {
                return false;
            }

            allow.is_empty() || allow.iter().any(|a| desc.contains(a.as_str()))
        })
        .collect()
}

/// 1-based offset pagination with saturating bounds.
pub fn page_slice(entries: &[DirectoryEntry], page: usize, limit: usize) -> &[DirectoryEntry] {
    let start = page.saturating_sub(1).saturating_mul(limit);
    if start >= entries.len() {
        return &[];
    }
    let end = (start + limit).min(entries.len());
    &entries[start..end]
}

/// `name` truncated to at most 8 chars plus an ellipsis.
pub fn short_name(name: &str) -> String {
    let mut chars = name.chars();
    let head: String = chars.by_ref().take(8).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Assemble the client-facing record for one directory entry.
///
/// A missing snapshot (failed NAV fetch) zero-fills the valuation fields and
/// marks the record incomplete; the page as a whole still renders.
pub fn build_record(
    entry: &DirectoryEntry,
    snapshot: Option<NavSnapshot>,
    total: usize,
) -> FundRecord {
    let (net_worth, expect_worth, expect_growth, net_worth_date, expect_worth_date, incomplete) =
        match snapshot {
            Some(snap) => (
                snap.net_worth,
                snap.expect_worth,
                snap.expect_growth,
                snap.net_worth_date,
                snap.expect_worth_date,
                snap.incomplete,
            ),
            None => (0.0, 0.0, 0.0, String::new(), String::new(), true),
        };

    FundRecord {
        id: entry.code.clone(),
        code: entry.code.clone(),
        name: entry.name.clone(),
        short_name: short_name(&entry.name),
        kind: entry.kind.clone(),
        net_worth,
        expect_worth,
        // the list endpoint does not carry these; the gateway detail does
        total_net_worth: 0.0,
        expect_growth,
        actual_day_growth: 0.0,
        estimated_change: expect_worth - net_worth,
        net_worth_date,
        expect_worth_date,
        total_count: total,
        incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, name: &str, kind: &str) -> DirectoryEntry {
        DirectoryEntry {
            code: code.to_string(),
            abbr: String::new(),
            name: name.to_string(),
            kind: kind.to_string(),
            pinyin: String::new(),
        }
    }

    fn snapshot(code: &str, net_worth: f64, expect_worth: f64) -> NavSnapshot {
        NavSnapshot {
            code: code.to_string(),
            name: String::new(),
            net_worth_date: "2024-06-12".to_string(),
            net_worth,
            expect_worth,
            expect_growth: 0.5,
            expect_worth_date: "2024-06-13 14:30".to_string(),
            estimated_change: expect_worth - net_worth,
            incomplete: false,
        }
    }

    #[test]
    fn deny_wins_over_allow() {
        let entries = vec![
            entry("1", "债券增强C", "债券型"),
            entry("2", "沪深增强A", "指数型"),
        ];

        let allow = vec!["增强".to_string()];
        let deny = vec!["债券".to_string()];

        let kept = apply_filters(entries, &allow, &deny);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "2");
    }

    #[test]
    fn empty_allow_list_keeps_everything_not_denied() {
        let entries = vec![entry("1", "a", "x"), entry("2", "b", "y")];
        let kept = apply_filters(entries, &[], &["b".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "1");
    }

    #[test]
    fn filter_matches_the_type_part_of_the_description() {
        let entries = vec![entry("1", "平安鑫安", "混合型"), entry("2", "南方现金", "货币型")];
        let kept = apply_filters(entries, &["混合型".to_string()], &[]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "1");
    }

    #[test]
    fn pagination_is_a_stable_disjoint_slice() {
        let entries: Vec<_> = (0..25)
            .map(|i| entry(&format!("{i:06}"), "fund", "t"))
            .collect();

        let p1: Vec<_> = page_slice(&entries, 1, 10).iter().map(|e| &e.code).collect();
        let p2: Vec<_> = page_slice(&entries, 2, 10).iter().map(|e| &e.code).collect();

        assert_eq!(p1.len(), 10);
        assert_eq!(p2.len(), 10);
        assert_eq!(p2[0], "000010");
        assert!(p1.iter().all(|c| !p2.contains(c)));

        // last partial page, then past the end
        assert_eq!(page_slice(&entries, 3, 10).len(), 5);
        assert!(page_slice(&entries, 4, 10).is_empty());
    }

    #[test]
    fn short_name_truncates_past_eight_chars() {
        assert_eq!(short_name("短名"), "短名");
        assert_eq!(short_name("恰好八个字符整数"), "恰好八个字符整数");
        assert_eq!(short_name("超过八个字符的基金名称"), "超过八个字符的基...");
    }

    #[test]
    fn record_derives_estimated_change_from_snapshot() {
        let e = entry("000001", "华夏成长", "混合型");
        let rec = build_record(&e, Some(snapshot("000001", 1.0290, 1.0315)), 42);

        assert_eq!(rec.total_count, 42);
        assert!((rec.estimated_change - (rec.expect_worth - rec.net_worth)).abs() < 1e-9);
        assert!(!rec.incomplete);
    }

    #[test]
    fn missing_snapshot_zero_fills_without_dropping_the_record() {
        let e = entry("000002", "测试基金", "债券型");
        let rec = build_record(&e, None, 10);

        assert_eq!(rec.code, "000002");
        assert_eq!(rec.net_worth, 0.0);
        assert_eq!(rec.expect_worth, 0.0);
        assert_eq!(rec.estimated_change, 0.0);
        assert!(rec.incomplete);
    }
}
