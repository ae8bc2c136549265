//! HTTP backend source
//!
//! Fetches the chat list from the messaging backend's JSON endpoint
//! (`GET {base_url}/api/chats`).

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::HttpSourceConfig;
use crate::conversation::ConversationRecord;
use crate::error::{ChatListError, Result};

use super::ConversationSource;

/// Source backed by the messaging backend's HTTP API
///
/// # Examples
///
/// ```
/// use chatlist::config::HttpSourceConfig;
/// use chatlist::source::HttpSource;
///
/// let source = HttpSource::new(HttpSourceConfig::default());
/// assert!(source.is_ok());
/// ```
pub struct HttpSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpSource {
    /// Create a new HTTP source
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatlist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ChatListError::from)
            .context("Failed to create HTTP client")?;

        tracing::info!("Initialized HTTP source: base_url={}", config.base_url);

        Ok(Self { client, config })
    }

    /// Full URL of the chat list endpoint
    pub fn chats_url(&self) -> String {
        format!("{}/api/chats", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ConversationSource for HttpSource {
    async fn fetch_conversations(&self) -> Result<Vec<ConversationRecord>> {
        let url = self.chats_url();
        tracing::debug!("Fetching chat list from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Failed to reach backend: {}", e);
            ChatListError::Fetch(format!("Failed to connect to backend: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatListError::Fetch(format!(
                "backend returned {}: {}",
                status, error_text
            ))
            .into());
        }

        // `null` means the backend had nothing to hand over, which is not the
        // same as an empty chat list
        let records: Option<Vec<ConversationRecord>> = response.json().await.map_err(|e| {
            ChatListError::Fetch(format!("Failed to parse chat list response: {}", e))
        })?;

        records.ok_or_else(|| ChatListError::Fetch("backend returned no data".to_string()).into())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
