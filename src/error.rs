use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Failure classes the API reports distinctly.
///
/// Upstream trouble (`UpstreamUnavailable`, `Parse`) is degraded inside the
/// services where possible and only surfaces here when nothing renderable is
/// left; the rest map straight onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("unexpected upstream payload: {0}")]
    Parse(String),

    #[error("not authenticated")]
    AuthRequired,

    #[error("not found")]
    NotFound,

    #[error("rule evaluation failed: {0}")]
    RuleEvaluation(String),

    #[error("db error: {0}")]
    Db(String),
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::UpstreamUnavailable(_) | ServiceError::Parse(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::AuthRequired => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::RuleEvaluation(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; transient upstream trouble is presented as a
    /// retry hint instead of raw error text.
    fn public_message(&self) -> String {
        match self {
            ServiceError::UpstreamUnavailable(_) | ServiceError::Parse(_) => {
                "fund data temporarily unavailable, please retry".to_string()
            }
            ServiceError::RuleEvaluation(_) => {
                "could not evaluate rule against live data, please retry".to_string()
            }
            ServiceError::Db(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        ServiceError::Db(e.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
