// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the LINE Messaging API.
//!
//! Covers the three calls the bot makes: reply delivery, attachment content
//! download, and display-name lookups. Also implements [`MessageTransport`]
//! so the orchestration layer stays channel-agnostic. Display-name lookups
//! are infallible by contract; any API failure degrades to a placeholder
//! name rather than dropping the attachment.

use std::time::Duration;

use async_trait::async_trait;
use attache_core::{AttacheError, ConversationKey, ConversationKind, MessageTransport};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

/// Base URL for messaging endpoints (replies, profiles, summaries).
const API_BASE_URL: &str = "https://api.line.me";
/// Base URL for attachment content downloads.
const DATA_BASE_URL: &str = "https://api-data.line.me";

/// LINE Messaging API client.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: reqwest::Client,
    api_base: String,
    data_base: String,
}

#[derive(Deserialize)]
struct GroupSummary {
    #[serde(rename = "groupName")]
    group_name: Option<String>,
}

#[derive(Deserialize)]
struct Profile {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

impl LineClient {
    /// Creates a client authenticating with a channel access token.
    pub fn new(access_token: &str) -> Result<Self, AttacheError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| AttacheError::Config(format!("invalid channel access token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AttacheError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: API_BASE_URL.to_string(),
            data_base: DATA_BASE_URL.to_string(),
        })
    }

    /// Overrides the API base URLs (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_urls(mut self, api: String, data: String) -> Self {
        self.api_base = api;
        self.data_base = data;
        self
    }

    /// Sends a text reply bound to a webhook reply token.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<(), AttacheError> {
        let response = self
            .client
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .json(&serde_json::json!({
                "replyToken": reply_token,
                "messages": [{"type": "text", "text": text}],
            }))
            .send()
            .await
            .map_err(|e| AttacheError::Channel {
                message: format!("reply delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttacheError::Channel {
                message: format!("reply delivery returned {status}: {body}"),
                source: None,
            });
        }
        debug!("reply delivered");
        Ok(())
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Option<T> {
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json().await.ok()
    }
}

#[async_trait]
impl MessageTransport for LineClient {
    async fn fetch_content(&self, content_id: &str) -> Result<Vec<u8>, AttacheError> {
        let response = self
            .client
            .get(format!(
                "{}/v2/bot/message/{content_id}/content",
                self.data_base
            ))
            .send()
            .await
            .map_err(|e| AttacheError::Channel {
                message: format!("content fetch failed for {content_id}: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttacheError::Channel {
                message: format!("content fetch for {content_id} returned {status}: {body}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| AttacheError::Channel {
            message: format!("content fetch for {content_id}: failed to read body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(content_id, size = bytes.len(), "fetched attachment content");
        Ok(bytes.to_vec())
    }

    async fn conversation_display_name(&self, key: &ConversationKey, kind: ConversationKind) -> String {
        match kind {
            ConversationKind::Direct => "direct-chat".to_string(),
            ConversationKind::Group => {
                let summary: Option<GroupSummary> = self
                    .fetch_json(format!("{}/v2/bot/group/{key}/summary", self.api_base))
                    .await;
                match summary.and_then(|s| s.group_name) {
                    Some(name) if !name.is_empty() => name,
                    _ => {
                        warn!(%key, "group summary unavailable, using id-derived name");
                        format!("group-{key}")
                    }
                }
            }
        }
    }

    async fn sender_display_name(
        &self,
        key: &ConversationKey,
        kind: ConversationKind,
        sender_id: &str,
    ) -> String {
        if sender_id.is_empty() {
            return "unknown".to_string();
        }
        let url = match kind {
            ConversationKind::Group => {
                format!("{}/v2/bot/group/{key}/member/{sender_id}", self.api_base)
            }
            ConversationKind::Direct => format!("{}/v2/bot/profile/{sender_id}", self.api_base),
        };
        let profile: Option<Profile> = self.fetch_json(url).await;
        match profile.and_then(|p| p.display_name) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!(%key, sender_id, "sender profile unavailable, using placeholder");
                "unknown".to_string()
            }
        }
    }
}
