//! Telegraph account model

use serde::{Deserialize, Serialize};

/// A page-service account
///
/// Only `access_token` matters to the core; everything else is shown by the
/// CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    /// Account short name
    #[serde(default)]
    pub short_name: String,
    /// Default author name
    #[serde(default)]
    pub author_name: String,
    /// Default author link
    #[serde(default)]
    pub author_url: String,
    /// Access token (only returned on creation or token revocation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// One-time login URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    /// Number of pages owned by the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

impl Account {
    /// Key under which the account's token is stored locally
    pub fn credential_key(short_name: &str) -> String {
        format!("telegraph:{short_name}")
    }
}
