use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,

    // Upstream fund data source
    pub fund_directory_url: String,
    pub fund_nav_base_url: String,

    // Messaging gateway (OAuth2 client credentials + push webhook)
    pub gateway_token_url: String,
    pub gateway_client_id: String,
    pub gateway_client_secret: String,
    pub gateway_scope: String,
    pub gateway_api_base: String,
    pub gateway_push_url: String,
    pub gateway_webhook_url: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB").unwrap_or_else(|_| "fundwatch".to_string());

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-dev-secret".to_string());
    let jwt_cookie_name = env::var("JWT_COOKIE_NAME").unwrap_or_else(|_| "auth".to_string());

    let fund_directory_url = env::var("FUND_DIRECTORY_URL")
        .unwrap_or_else(|_| "https://fund.eastmoney.com/js/fundcode_search.js".to_string());

    let fund_nav_base_url = env::var("FUND_NAV_BASE_URL")
        .unwrap_or_else(|_| "https://fundgz.1234567.com.cn/js".to_string());

    let gateway_token_url = env::var("GATEWAY_TOKEN_URL").unwrap_or_default();
    let gateway_client_id = env::var("GATEWAY_CLIENT_ID").unwrap_or_default();
    let gateway_client_secret = env::var("GATEWAY_CLIENT_SECRET").unwrap_or_default();
    let gateway_scope = env::var("GATEWAY_SCOPE").unwrap_or_else(|_| "fund".to_string());
    let gateway_api_base = env::var("GATEWAY_API_BASE").unwrap_or_default();
    let gateway_push_url = env::var("GATEWAY_PUSH_URL").unwrap_or_default();
    let gateway_webhook_url = env::var("GATEWAY_WEBHOOK_URL").unwrap_or_default();

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        fund_directory_url,
        fund_nav_base_url,
        gateway_token_url,
        gateway_client_id,
        gateway_client_secret,
        gateway_scope,
        gateway_api_base,
        gateway_push_url,
        gateway_webhook_url,
    }
}
