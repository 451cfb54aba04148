// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload orchestration.
//!
//! For each inbound attachment: resolve routing from the conversation's
//! settings, resolve the remote target folder when cloud routing is active,
//! pick a collision-free name, fetch the payload, write it to the enabled
//! sinks, and append a ledger record.
//!
//! All of that happens under one process-wide lock: at most one attachment,
//! from any conversation, is being persisted at any instant. The lock is the
//! ledger mutex itself, held across the network round trips, so the ledger
//! and the sinks can never interleave partial work across attachments.

use std::path::Path;
use std::sync::Arc;

use attache_core::{
    AttacheError, AttachmentCategory, AttachmentEvent, ConversationKey, MessageTransport,
    RemoteStore, UploadOutcome, UploadRecord,
};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::ledger::UploadLedger;
use crate::local::LocalSink;
use crate::naming;
use crate::remote::{RemoteSink, resolve_folder};
use crate::settings::ConversationSettings;

/// Coordinates sinks, naming, and the ledger for every inbound attachment.
pub struct UploadOrchestrator {
    transport: Arc<dyn MessageTransport>,
    /// `None` when the process has no remote-store credentials; cloud routing
    /// is then skipped regardless of per-conversation toggles.
    remote: Option<Arc<dyn RemoteStore>>,
    settings: Arc<ConversationSettings>,
    local: LocalSink,
    sink: RemoteSink,
    /// The process-wide upload lock. Guards the ledger and serializes the
    /// whole of [`handle`](Self::handle).
    ledger: Mutex<UploadLedger>,
}

impl UploadOrchestrator {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        remote: Option<Arc<dyn RemoteStore>>,
        settings: Arc<ConversationSettings>,
        local_root: impl AsRef<Path>,
    ) -> Self {
        Self {
            transport,
            remote,
            settings,
            local: LocalSink::new(local_root.as_ref()),
            sink: RemoteSink::default(),
            ledger: Mutex::new(UploadLedger::new()),
        }
    }

    /// Replaces the remote sink retry policy (used to shrink delays in tests
    /// and to apply the configured ceiling).
    pub fn with_remote_sink(mut self, sink: RemoteSink) -> Self {
        self.sink = sink;
        self
    }

    /// Processes one attachment end to end and returns the outcome the
    /// channel layer formats a reply from.
    ///
    /// Sink failures are captured independently in the outcome (best-effort
    /// both): a local write error does not stop the remote attempt and vice
    /// versa. A payload fetch failure aborts before any sink runs and leaves
    /// no ledger record; otherwise exactly one record is appended, even when
    /// both sinks are disabled.
    pub async fn handle(&self, event: &AttachmentEvent) -> Result<UploadOutcome, AttacheError> {
        let mut ledger = self.ledger.lock().await;

        let config = self.settings.get(&event.conversation).await;
        // Names come back from the platform unvetted; sanitize once here so
        // the ledger, the local path, and the remote object name all agree.
        let display_name = naming::sanitize_component(
            &self
                .transport
                .conversation_display_name(&event.conversation, event.kind)
                .await,
        );
        let sender_name = naming::sanitize_component(
            &self
                .transport
                .sender_display_name(&event.conversation, event.kind, &event.sender_id)
                .await,
        );

        let mut cloud_error = None;
        let mut target_folder = None;
        if config.cloud_enabled {
            match (
                self.remote.as_deref(),
                self.settings.parent_folder_for(&event.conversation).await,
            ) {
                (Some(remote), Some(parent)) => {
                    match self
                        .resolve_target(remote, &display_name, event.category, &parent)
                        .await
                    {
                        Ok(folder) => target_folder = Some(folder),
                        Err(e) => {
                            warn!(conversation = %event.conversation, error = %e, "remote folder resolution failed");
                            cloud_error = Some(e.to_string());
                        }
                    }
                }
                // The command boundary rejects enabling cloud without a
                // folder, so this only happens when the process itself has
                // no remote store configured.
                _ => cloud_error = Some("remote storage is not configured".to_string()),
            }
        }

        let candidate = candidate_name(&sender_name, event);
        let name = naming::unique_name(&ledger.names(&event.conversation, event.category), &candidate);

        let bytes = self.transport.fetch_content(&event.content_id).await?;

        let mut local_path = None;
        let mut local_error = None;
        if config.local_enabled {
            match self
                .local
                .store(&display_name, event.category, &name, &bytes)
                .await
            {
                Ok(path) => local_path = Some(path),
                Err(e) => {
                    warn!(conversation = %event.conversation, name, error = %e, "local sink failed");
                    local_error = Some(e.to_string());
                }
            }
        }

        let mut cloud_link = None;
        let mut remote_file_id = None;
        if let (Some(remote), Some(folder)) = (self.remote.as_deref(), target_folder) {
            let mime = event.category.mime_for(&name);
            match self.sink.upload(remote, &bytes, &name, mime, &folder).await {
                Ok((file_id, link)) => {
                    remote_file_id = Some(file_id);
                    cloud_link = Some(link);
                }
                Err(e) => {
                    warn!(conversation = %event.conversation, name, error = %e, "remote sink failed");
                    cloud_error = Some(e.to_string());
                }
            }
        }

        ledger.append(
            event.conversation.clone(),
            event.category,
            UploadRecord {
                name: name.clone(),
                uploaded_at: Utc::now(),
                cloud_link: cloud_link.clone(),
                remote_file_id,
            },
        );

        info!(
            conversation = %event.conversation,
            category = %event.category,
            name,
            local = local_path.is_some(),
            cloud = cloud_link.is_some(),
            "attachment processed"
        );

        Ok(UploadOutcome {
            name,
            category: event.category,
            local_path,
            local_error,
            cloud_link,
            cloud_error,
            local_enabled: config.local_enabled,
            cloud_enabled: config.cloud_enabled,
        })
    }

    /// Resolves `<parent>/<conversation display name>/<category subfolder>`,
    /// creating either level on demand. Re-queried per attachment.
    async fn resolve_target(
        &self,
        remote: &dyn RemoteStore,
        display_name: &str,
        category: AttachmentCategory,
        parent_id: &str,
    ) -> Result<String, AttacheError> {
        let conversation_folder = resolve_folder(remote, display_name, parent_id).await?;
        resolve_folder(remote, category.subdir(), &conversation_folder).await
    }

    /// Snapshot of the ledger records for one (conversation, category).
    pub async fn records(
        &self,
        key: &ConversationKey,
        category: AttachmentCategory,
    ) -> Vec<UploadRecord> {
        self.ledger.lock().await.records(key, category).to_vec()
    }

    /// Total ledger entries across all conversations.
    pub async fn ledger_len(&self) -> usize {
        self.ledger.lock().await.len()
    }
}

/// Candidate filename before de-duplication:
/// `<sender>-<original name>` for documents carrying one,
/// `<sender>-<content id>.<default ext>` otherwise.
///
/// The original name is attacker-controlled and sanitized down to a single
/// path component before it ever reaches a filesystem join.
fn candidate_name(sender_name: &str, event: &AttachmentEvent) -> String {
    match (&event.category, &event.file_name) {
        (AttachmentCategory::Document, Some(original)) => {
            format!("{sender_name}-{}", naming::sanitize_component(original))
        }
        _ => format!(
            "{sender_name}-{}.{}",
            event.content_id,
            event.category.default_extension()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attache_core::ConversationKind;

    fn event(category: AttachmentCategory, file_name: Option<&str>) -> AttachmentEvent {
        AttachmentEvent {
            conversation: ConversationKey("G1".into()),
            kind: ConversationKind::Group,
            sender_id: "U-alice".into(),
            reply_token: None,
            category,
            content_id: "img123".into(),
            file_name: file_name.map(|s| s.to_string()),
        }
    }

    #[test]
    fn image_candidate_uses_content_id_and_default_extension() {
        let e = event(AttachmentCategory::Image, None);
        assert_eq!(candidate_name("Alice", &e), "Alice-img123.jpg");
    }

    #[test]
    fn video_candidate_uses_mp4() {
        let e = event(AttachmentCategory::Video, None);
        assert_eq!(candidate_name("Alice", &e), "Alice-img123.mp4");
    }

    #[test]
    fn document_candidate_keeps_original_name() {
        let e = event(AttachmentCategory::Document, Some("report.pdf"));
        assert_eq!(candidate_name("Alice", &e), "Alice-report.pdf");
    }

    #[test]
    fn document_without_name_falls_back_to_content_id() {
        let e = event(AttachmentCategory::Document, None);
        assert_eq!(candidate_name("Alice", &e), "Alice-img123.bin");
    }

    #[test]
    fn document_candidate_neutralizes_traversal_names() {
        let e = event(AttachmentCategory::Document, Some("../../../escape.bin"));
        let candidate = candidate_name("Alice", &e);
        assert_eq!(candidate, "Alice-.._.._.._escape.bin");
        assert!(!candidate.contains('/'));
    }
}
