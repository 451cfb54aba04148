// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation routing configuration store.
//!
//! Text commands mutate this store without taking the upload lock, so a
//! toggle arriving mid-upload applies to the next attachment, not the one
//! currently being persisted. That race is deliberate; the store carries its
//! own mutex.

use std::collections::HashMap;

use attache_core::{AttacheError, ConversationConfig, ConversationKey};
use tokio::sync::Mutex;
use tracing::info;

/// In-memory store of [`ConversationConfig`] records, created lazily per key.
#[derive(Debug)]
pub struct ConversationSettings {
    /// Process-wide fallback parent folder when a conversation has not set one.
    default_folder_id: Option<String>,
    configs: Mutex<HashMap<ConversationKey, ConversationConfig>>,
}

impl ConversationSettings {
    pub fn new(default_folder_id: Option<String>) -> Self {
        Self {
            default_folder_id,
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot of the conversation's config, creating the default record on
    /// first contact.
    pub async fn get(&self, key: &ConversationKey) -> ConversationConfig {
        let mut configs = self.configs.lock().await;
        configs.entry(key.clone()).or_default().clone()
    }

    pub async fn set_reply_enabled(&self, key: &ConversationKey, enabled: bool) {
        let mut configs = self.configs.lock().await;
        configs.entry(key.clone()).or_default().reply_enabled = enabled;
        info!(%key, enabled, "reply toggle updated");
    }

    pub async fn set_local_enabled(&self, key: &ConversationKey, enabled: bool) {
        let mut configs = self.configs.lock().await;
        configs.entry(key.clone()).or_default().local_enabled = enabled;
        info!(%key, enabled, "local sink toggle updated");
    }

    /// Enables cloud routing for a conversation.
    ///
    /// Rejected unless a parent folder id is resolvable (user-set or process
    /// default), so the orchestrator never observes a cloud-enabled
    /// conversation it cannot route.
    pub async fn enable_cloud(&self, key: &ConversationKey) -> Result<(), AttacheError> {
        let mut configs = self.configs.lock().await;
        let config = configs.entry(key.clone()).or_default();
        if config.drive_folder_id.is_none() && self.default_folder_id.is_none() {
            return Err(AttacheError::Config(
                "no cloud folder configured; set one with the folder command first".into(),
            ));
        }
        config.cloud_enabled = true;
        info!(%key, "cloud routing enabled");
        Ok(())
    }

    pub async fn disable_cloud(&self, key: &ConversationKey) {
        let mut configs = self.configs.lock().await;
        configs.entry(key.clone()).or_default().cloud_enabled = false;
        info!(%key, "cloud routing disabled");
    }

    /// Sets the conversation's remote parent folder id.
    pub async fn set_folder(&self, key: &ConversationKey, folder_id: String) {
        let mut configs = self.configs.lock().await;
        configs.entry(key.clone()).or_default().drive_folder_id = Some(folder_id);
        info!(%key, "cloud folder updated");
    }

    /// The parent folder the conversation's uploads resolve under:
    /// the user-set folder, falling back to the process default.
    pub async fn parent_folder_for(&self, key: &ConversationKey) -> Option<String> {
        let configs = self.configs.lock().await;
        configs
            .get(key)
            .and_then(|c| c.drive_folder_id.clone())
            .or_else(|| self.default_folder_id.clone())
    }
}
