//! HTTP Identity Client
//!
//! Treats the identity provider's session-check endpoint as the
//! authenticated flag: a successful response means the login round trip has
//! landed, 401/403 means it has not yet.

use crate::auth::IdentityClient;
use crate::config::PortalConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Request timeout, kept below the poll interval so checks never overlap
const REQUEST_TIMEOUT: Duration = Duration::from_millis(400);

/// Identity client backed by the provider's HTTP endpoints
pub struct HttpIdentityClient {
    client: reqwest::Client,
    session_url: String,
    logout_url: String,
}

impl HttpIdentityClient {
    pub fn new(session_url: impl Into<String>, logout_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build identity HTTP client")?;

        Ok(Self {
            client,
            session_url: session_url.into(),
            logout_url: logout_url.into(),
        })
    }

    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        Self::new(&config.identity_session_url, &config.identity_logout_url)
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn is_authenticated(&self) -> Result<bool> {
        let response = self
            .client
            .get(&self.session_url)
            .send()
            .await
            .context("Identity session check failed")?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            status => anyhow::bail!("Identity session check returned {}", status),
        }
    }

    async fn logout(&self) -> Result<()> {
        self.client
            .post(&self.logout_url)
            .send()
            .await
            .context("Identity logout request failed")?
            .error_for_status()
            .context("Identity logout rejected")?;
        Ok(())
    }
}
