//! Telegraph API client

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::{Account, Page, PageDraft};

use super::{Credential, PageStore, StoreError};

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.telegra.ph";

/// Telegraph API client
pub struct TelegraphClient {
    client: Client,
    base_url: String,
}

impl TelegraphClient {
    /// Create a new client against `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build API URL
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Create a new account and return it, including its access token
    pub async fn create_account(
        &self,
        short_name: &str,
        author_name: Option<&str>,
    ) -> Result<Account, StoreError> {
        let mut params = vec![("short_name", short_name)];
        if let Some(author_name) = author_name {
            params.push(("author_name", author_name));
        }

        tracing::debug!("Creating account {short_name}");

        let response = self
            .client
            .post(self.api_url("createAccount"))
            .form(&params)
            .send()
            .await
            .map_err(network)?;

        read_envelope(response).await
    }

    /// Fetch account information for `credential`
    pub async fn get_account_info(&self, credential: &Credential) -> Result<Account, StoreError> {
        let fields = r#"["short_name","author_name","author_url","auth_url","page_count"]"#;

        let response = self
            .client
            .get(self.api_url("getAccountInfo"))
            .query(&[("access_token", credential.token()), ("fields", fields)])
            .send()
            .await
            .map_err(network)?;

        read_envelope(response).await
    }
}

impl PageStore for TelegraphClient {
    async fn create_page(
        &self,
        credential: &Credential,
        draft: &PageDraft,
    ) -> Result<Page, StoreError> {
        let content = serde_json::to_string(&draft.content)
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut params = vec![
            ("access_token", credential.token()),
            ("title", draft.title.as_str()),
            ("content", content.as_str()),
            ("return_content", "false"),
        ];
        if let Some(author_name) = draft.author_name.as_deref() {
            params.push(("author_name", author_name));
        }

        tracing::debug!("Creating page {:?}", draft.title);

        let response = self
            .client
            .post(self.api_url("createPage"))
            .form(&params)
            .send()
            .await
            .map_err(network)?;

        read_envelope(response).await
    }

    async fn get_page(&self, path: &str, return_content: bool) -> Result<Page, StoreError> {
        let url = self.api_url(&format!("getPage/{path}"));
        let return_content = if return_content { "true" } else { "false" };

        let response = self
            .client
            .get(&url)
            .query(&[("return_content", return_content)])
            .send()
            .await
            .map_err(network)?;

        read_envelope(response).await
    }
}

// ==================== API Types ====================

/// Every Telegraph response is wrapped in `{ok, result | error}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, StoreError> {
        if self.ok {
            return self
                .result
                .ok_or_else(|| StoreError::Decode("missing result".to_string()));
        }

        let error = self.error.unwrap_or_else(|| "Unknown error".to_string());
        Err(classify(&error))
    }
}

/// Map a service error code onto a store error
fn classify(error: &str) -> StoreError {
    if error == "PAGE_NOT_FOUND" {
        StoreError::NotFound
    } else if error.contains("ACCESS_TOKEN") {
        StoreError::Unauthorized(error.to_string())
    } else {
        StoreError::Api(error.to_string())
    }
}

fn network(e: reqwest::Error) -> StoreError {
    StoreError::Network(e.to_string())
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }

    let body = response.text().await.map_err(network)?;
    if !status.is_success() {
        // Telegraph still sends an envelope on most error statuses
        if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            if !envelope.ok {
                return Err(classify(envelope.error.as_deref().unwrap_or("Unknown error")));
            }
        }
        return Err(StoreError::Api(format!("HTTP {status}")));
    }

    decode(&body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map_err(|e| StoreError::Decode(e.to_string()))?
        .into_result()
}
