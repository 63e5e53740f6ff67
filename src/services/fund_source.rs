use regex::Regex;
use reqwest::Client;

use crate::error::ServiceError;

/// One row of the upstream fund directory: `(code, abbreviation, full name,
/// category, pinyin)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub code: String,
    pub abbr: String,
    pub name: String,
    pub kind: String,
    pub pinyin: String,
}

/// A single fund's live valuation snapshot.
///
/// All numeric fields default to `0.0` when upstream omits or malforms them
/// (suspended funds frequently ship partial payloads); `incomplete` records
/// that this happened. `estimated_change` is always derived locally as
/// `expect_worth - net_worth`, never read from upstream.
#[derive(Debug, Clone)]
pub struct NavSnapshot {
    pub code: String,
    pub name: String,

    // settlement date of the settled NAV, "YYYY-MM-DD"
    pub net_worth_date: String,

    // prior-day settled NAV
    pub net_worth: f64,

    // intraday estimated NAV
    pub expect_worth: f64,

    // estimated day percent change
    pub expect_growth: f64,

    // snapshot timestamp of the estimate
    pub expect_worth_date: String,

    pub estimated_change: f64,

    pub incomplete: bool,
}

/// Client for the public fund data source.
///
/// Neither endpoint speaks JSON: the directory is a JS assignment statement
/// and the NAV endpoint is a JSONP call. Both are pattern-matched apart
/// before parsing.
#[derive(Clone)]
pub struct FundSourceClient {
    http: Client,
    directory_url: String,
    nav_base_url: String,
}

impl FundSourceClient {
    pub fn new(directory_url: String, nav_base_url: String) -> Self {
        Self {
            http: Client::new(),
            directory_url,
            nav_base_url,
        }
    }

    /// Fetch the full fund directory.
    ///
    /// Errors here mean "temporarily unavailable", never "zero funds exist";
    /// the aggregator degrades them to an empty page and logs.
    pub async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>, ServiceError> {
        let res = self
            .http
            .get(&self.directory_url)
            .send()
            .await
            .map_err(|e| ServiceError::UpstreamUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "directory fetch failed: {}",
                res.status()
            )));
        }

        let body = res
            .text()
            .await
            .map_err(|e| ServiceError::UpstreamUnavailable(e.to_string()))?;

        parse_directory_body(&body)
    }

    /// Fetch one fund's live NAV snapshot.
    ///
    /// Any failure (network, status, payload) yields `None` for this one
    /// fund so a page of funds tolerates individual holes.
    pub async fn fetch_nav(&self, code: &str) -> Option<NavSnapshot> {
        let url = format!("{}/{}.js", self.nav_base_url, code);

        let res = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(code, error = %e, "nav fetch failed");
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::debug!(code, status = %res.status(), "nav fetch non-2xx");
            return None;
        }

        let body = res.text().await.ok()?;

        match parse_nav_body(&body) {
            Ok(snap) => Some(snap),
            Err(e) => {
                tracing::debug!(code, error = %e, "nav payload did not parse");
                None
            }
        }
    }
}

/// The directory endpoint returns a JS assignment:
/// `var r = [["000001","HXCZ","华夏成长","混合型","HUAXIACHENGZHANG"], ...];`
/// Extract the array literal and parse it as JSON.
pub fn parse_directory_body(body: &str) -> Result<Vec<DirectoryEntry>, ServiceError> {
    let re = Regex::new(r"(?s)var\s+r\s*=\s*(\[.*\])").expect("directory regex");

    let caps = re
        .captures(body)
        .ok_or_else(|| ServiceError::Parse("directory body is not a `var r = [...]` assignment".to_string()))?;

    let literal = caps[1].trim_end_matches(';').trim();

    let rows: Vec<Vec<String>> = serde_json::from_str(literal)
        .map_err(|e| ServiceError::Parse(format!("directory literal: {e}")))?;

    let entries = rows
        .into_iter()
        .filter(|row| row.len() >= 5)
        .map(|row| {
            let mut it = row.into_iter();
            DirectoryEntry {
                code: it.next().unwrap_or_default(),
                abbr: it.next().unwrap_or_default(),
                name: it.next().unwrap_or_default(),
                kind: it.next().unwrap_or_default(),
                pinyin: it.next().unwrap_or_default(),
            }
        })
        .collect();

    Ok(entries)
}

#[derive(Debug, serde::Deserialize)]
struct RawNav {
    // fund code
    fundcode: Option<String>,
    // fund name, sometimes percent-encoded
    name: Option<String>,
    // settlement date of dwjz
    jzrq: Option<String>,
    // settled NAV
    dwjz: Option<String>,
    // estimated intraday NAV
    gsz: Option<String>,
    // estimated day growth percent
    gszzl: Option<String>,
    // estimate timestamp
    gztime: Option<String>,
}

/// The NAV endpoint returns a JSONP call: `jsonpgz({...});`
/// Extract the object between the outer call parens and parse it.
pub fn parse_nav_body(body: &str) -> Result<NavSnapshot, ServiceError> {
    let re = Regex::new(r"(?s)jsonpgz\s*\((.*)\)\s*;?\s*$").expect("jsonp regex");

    let caps = re
        .captures(body.trim())
        .ok_or_else(|| ServiceError::Parse("nav body is not a `jsonpgz(...)` call".to_string()))?;

    let raw: RawNav = serde_json::from_str(caps[1].trim())
        .map_err(|e| ServiceError::Parse(format!("nav object: {e}")))?;

    let (net_worth, net_worth_ok) = parse_decimal(raw.dwjz.as_deref());
    let (expect_worth, expect_worth_ok) = parse_decimal(raw.gsz.as_deref());
    let (expect_growth, expect_growth_ok) = parse_decimal(raw.gszzl.as_deref());

    let incomplete = !(net_worth_ok && expect_worth_ok && expect_growth_ok);

    Ok(NavSnapshot {
        code: raw.fundcode.unwrap_or_default(),
        name: decode_name(raw.name.unwrap_or_default()),
        net_worth_date: raw.jzrq.unwrap_or_default(),
        net_worth,
        expect_worth,
        expect_growth,
        expect_worth_date: raw.gztime.unwrap_or_default(),
        estimated_change: expect_worth - net_worth,
        incomplete,
    })
}

/// Missing or unparseable decimals become `0.0` rather than an error;
/// the second element says whether the field actually parsed.
fn parse_decimal(raw: Option<&str>) -> (f64, bool) {
    match raw {
        Some(s) => match s.trim().parse::<f64>() {
            Ok(v) => (v, true),
            Err(_) => (0.0, false),
        },
        None => (0.0, false),
    }
}

/// Fund names occasionally arrive percent-encoded; fall back to the raw
/// string when decoding fails.
fn decode_name(name: String) -> String {
    match urlencoding::decode(&name) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => name,
    }
}
