// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging transport for deterministic testing.
//!
//! Serves pre-loaded attachment payloads and display names, and tracks how
//! many fetches run concurrently so tests can assert the orchestrator's
//! mutual-exclusion guarantee.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use attache_core::{AttacheError, ConversationKey, ConversationKind, MessageTransport};

/// A mock [`MessageTransport`] with injectable content and name tables.
#[derive(Debug, Default)]
pub struct MockTransport {
    contents: HashMap<String, Vec<u8>>,
    display_names: HashMap<String, String>,
    sender_names: HashMap<String, String>,
    failing_content_ids: HashSet<String>,
    fetch_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers payload bytes for a content id.
    pub fn with_content(mut self, content_id: &str, bytes: &[u8]) -> Self {
        self.contents.insert(content_id.to_string(), bytes.to_vec());
        self
    }

    /// Registers a display name for a conversation key.
    pub fn with_display_name(mut self, key: &str, name: &str) -> Self {
        self.display_names.insert(key.to_string(), name.to_string());
        self
    }

    /// Registers a display name for a sender id.
    pub fn with_sender_name(mut self, sender_id: &str, name: &str) -> Self {
        self.sender_names
            .insert(sender_id.to_string(), name.to_string());
        self
    }

    /// Makes `fetch_content` fail for the given content id.
    pub fn with_failing_content(mut self, content_id: &str) -> Self {
        self.failing_content_ids.insert(content_id.to_string());
        self
    }

    /// Adds an artificial delay inside `fetch_content`, widening the window
    /// in which concurrent fetches would overlap if serialization broke.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Highest number of `fetch_content` calls observed in flight at once.
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn fetch_content(&self, content_id: &str) -> Result<Vec<u8>, AttacheError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing_content_ids.contains(content_id) {
            Err(AttacheError::Channel {
                message: format!("content {content_id} is unavailable"),
                source: None,
            })
        } else {
            self.contents
                .get(content_id)
                .cloned()
                .ok_or_else(|| AttacheError::Channel {
                    message: format!("unknown content id {content_id}"),
                    source: None,
                })
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn conversation_display_name(
        &self,
        key: &ConversationKey,
        kind: ConversationKind,
    ) -> String {
        if let Some(name) = self.display_names.get(key.as_str()) {
            return name.clone();
        }
        match kind {
            ConversationKind::Group => format!("group-{key}"),
            ConversationKind::Direct => "direct-chat".to_string(),
        }
    }

    async fn sender_display_name(
        &self,
        _key: &ConversationKey,
        _kind: ConversationKind,
        sender_id: &str,
    ) -> String {
        self.sender_names
            .get(sender_id)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }
}
