//! Page service clients

pub mod telegraph;

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::models::{Page, PageDraft};

/// Errors returned by a page store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No page lives at the requested path
    #[error("page not found")]
    NotFound,
    /// The credential was missing, invalid or revoked
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The service rejected the request
    #[error("page service error: {0}")]
    Api(String),
    /// The request never produced a usable response
    #[error("network error: {0}")]
    Network(String),
    /// The response could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Opaque access token required to create pages
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap an access token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for building requests
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Remote page store: create and fetch pages by path
///
/// Futures are `Send` so sessions can be driven from spawned tasks.
pub trait PageStore: Send + Sync {
    /// Create a page owned by `credential`
    fn create_page(
        &self,
        credential: &Credential,
        draft: &PageDraft,
    ) -> impl Future<Output = Result<Page, StoreError>> + Send;

    /// Fetch the page at `path`
    fn get_page(
        &self,
        path: &str,
        return_content: bool,
    ) -> impl Future<Output = Result<Page, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("secret-token");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.token(), "secret-token");
    }
}
