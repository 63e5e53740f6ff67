use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Settings;
use crate::error::ServiceError;
use crate::services::cache::{TtlCache, TOKEN_TTL};

const TOKEN_CACHE_KEY: &str = "gateway-token";

/// Client for the messaging gateway: OAuth2 client-credentials token,
/// bearer-authenticated fund detail, and markdown push delivery.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    api_base: String,
    push_url: String,
    webhook_url: String,
    token_cache: TtlCache<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Richer per-fund detail than the public NAV endpoint; used for rule
/// evaluation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FundDetail {
    pub code: String,
    pub name: String,

    #[serde(rename = "netWorth", default)]
    pub net_worth: f64,

    #[serde(rename = "expectWorth", default)]
    pub expect_worth: f64,

    #[serde(rename = "totalNetWorth", default)]
    pub total_net_worth: f64,

    // settled day percent change
    #[serde(rename = "dayGrowth", default)]
    pub actual_day_growth: f64,

    #[serde(rename = "expectGrowth", default)]
    pub expect_growth: f64,

    #[serde(rename = "netWorthDate", default)]
    pub net_worth_date: String,
}

impl GatewayClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Client::new(),
            token_url: settings.gateway_token_url.clone(),
            client_id: settings.gateway_client_id.clone(),
            client_secret: settings.gateway_client_secret.clone(),
            scope: settings.gateway_scope.clone(),
            api_base: settings.gateway_api_base.clone(),
            push_url: settings.gateway_push_url.clone(),
            webhook_url: settings.gateway_webhook_url.clone(),
            token_cache: TtlCache::new(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.token_url.trim().is_empty() && !self.client_id.trim().is_empty()
    }

    /// Bearer token through the 1h cache.
    async fn bearer_token(&self) -> Result<String, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::UpstreamUnavailable(
                "gateway credentials are not configured".to_string(),
            ));
        }

        if let Some(token) = self.token_cache.get(TOKEN_CACHE_KEY) {
            return Ok(token);
        }

        let res = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::UpstreamUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "token fetch failed: {}",
                res.status()
            )));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        self.token_cache
            .set(TOKEN_CACHE_KEY, token.access_token.clone(), TOKEN_TTL);

        Ok(token.access_token)
    }

    pub async fn fund_detail(&self, code: &str) -> Result<FundDetail, ServiceError> {
        let token = self.bearer_token().await?;
        let url = format!("{}/{}", self.api_base, code);

        let res = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ServiceError::UpstreamUnavailable(e.to_string()))?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound);
        }

        if !res.status().is_success() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "fund detail failed: {}",
                res.status()
            )));
        }

        res.json::<FundDetail>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }

    /// Deliver one markdown notification through the push webhook.
    pub async fn push_markdown(&self, title: &str, text: &str) -> Result<(), ServiceError> {
        let token = self.bearer_token().await?;

        let res = self
            .http
            .post(&self.push_url)
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "text": text,
                "webhookUrl": self.webhook_url,
            }))
            .send()
            .await
            .map_err(|e| ServiceError::UpstreamUnavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "push failed: {}",
                res.status()
            )));
        }

        Ok(())
    }
}
