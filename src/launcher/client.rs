use crate::token::CredentialRequest;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

pub const TOKEN_PATH: &str = "/api/livekit/token";

/// Obtains a session credential for the launcher
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self, request: &CredentialRequest) -> Result<String>;
}

/// Response of the token endpoint, success or error shaped
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Calls `POST {base_url}/api/livekit/token`
#[derive(Debug, Clone)]
pub struct HttpTokenClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTokenClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenFetcher for HttpTokenClient {
    async fn fetch_token(&self, request: &CredentialRequest) -> Result<String> {
        info!("Requesting session token from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .context("Token request failed")?;

        let status = response.status();
        let body: TokenResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let reason = body.error.unwrap_or_else(|| status.to_string());
            bail!("Token endpoint returned {}: {}", status, reason);
        }

        body.token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("Token endpoint response did not include a token"))
    }
}
