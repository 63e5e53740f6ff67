use serde::{Deserialize, Serialize};

/// The resolved identity of the requesting user.
///
/// Identity is issued by the external OAuth2 provider; the id is its opaque
/// subject string. There is no local user table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,

    #[serde(default)]
    pub nickname: Option<String>,
}
