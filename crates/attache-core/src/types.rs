// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Attache workspace.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier for a conversation: a group id or an individual user id.
///
/// Unique per real-world conversation and used as the lookup key into every
/// piece of per-conversation state (settings, ledger, remote folder choice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey(pub String);

impl ConversationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a conversation is a group chat or a one-to-one chat.
///
/// Display-name resolution differs between the two: groups have a queryable
/// summary, direct chats use a fixed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationKind {
    Group,
    Direct,
}

/// The three attachment kinds the bot archives.
///
/// The category determines the local subdirectory, the remote subfolder name,
/// and the fallback extension/MIME type when the source protocol supplies none.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AttachmentCategory {
    Image,
    Document,
    Video,
}

impl AttachmentCategory {
    /// Subdirectory name under the conversation folder, identical for the
    /// local sink and the remote store. External listing/search commands
    /// depend on this exact layout.
    pub fn subdir(&self) -> &'static str {
        match self {
            AttachmentCategory::Image => "images",
            AttachmentCategory::Document => "files",
            AttachmentCategory::Video => "videos",
        }
    }

    /// Extension used when the platform does not carry an original filename.
    pub fn default_extension(&self) -> &'static str {
        match self {
            AttachmentCategory::Image => "jpg",
            AttachmentCategory::Document => "bin",
            AttachmentCategory::Video => "mp4",
        }
    }

    /// MIME type reported to the remote store for a file of this category.
    ///
    /// Documents are sniffed by name: `.pdf` uploads as `application/pdf`,
    /// everything else as a generic octet stream.
    pub fn mime_for(&self, name: &str) -> &'static str {
        match self {
            AttachmentCategory::Image => "image/jpeg",
            AttachmentCategory::Video => "video/mp4",
            AttachmentCategory::Document => {
                if name.to_ascii_lowercase().ends_with(".pdf") {
                    "application/pdf"
                } else {
                    "application/octet-stream"
                }
            }
        }
    }
}

/// An inbound attachment delivered by the messaging platform.
#[derive(Debug, Clone)]
pub struct AttachmentEvent {
    /// Conversation the attachment arrived in.
    pub conversation: ConversationKey,
    /// Group or direct chat.
    pub kind: ConversationKind,
    /// Platform identifier of the sender.
    pub sender_id: String,
    /// One-shot token for replying to this event, if the platform issued one.
    pub reply_token: Option<String>,
    /// Image, document, or video.
    pub category: AttachmentCategory,
    /// Platform content id used to fetch the payload bytes.
    pub content_id: String,
    /// Original filename, only supplied for documents.
    pub file_name: Option<String>,
}

/// Per-conversation routing configuration.
///
/// Created lazily on first contact from a new conversation and lives for the
/// process lifetime. `cloud_enabled` may only be switched on when a parent
/// folder id (user-set or process default) is resolvable; that rule is
/// enforced at the command boundary, so the orchestrator never observes a
/// cloud-enabled conversation without a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationConfig {
    /// Whether upload outcomes are echoed back into the chat.
    pub reply_enabled: bool,
    /// Whether payloads are written to the local filesystem sink.
    pub local_enabled: bool,
    /// Whether payloads are uploaded to the remote store.
    pub cloud_enabled: bool,
    /// User-chosen remote parent folder, overriding the process default.
    pub drive_folder_id: Option<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            reply_enabled: false,
            local_enabled: true,
            cloud_enabled: false,
            drive_folder_id: None,
        }
    }
}

/// Immutable ledger entry describing one archived attachment.
///
/// Exactly one record is appended per processed attachment, in arrival order,
/// keyed by (conversation, category). `cloud_link` is present iff the remote
/// upload succeeded for that attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Final, collision-free filename.
    pub name: String,
    /// When the attachment finished processing.
    pub uploaded_at: DateTime<Utc>,
    /// Shareable remote link, when cloud routing succeeded.
    pub cloud_link: Option<String>,
    /// Remote object id backing `cloud_link`.
    pub remote_file_id: Option<String>,
}

/// Summary of one orchestration run, returned to the channel layer so it can
/// compose a status reply.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Final, de-duplicated filename.
    pub name: String,
    pub category: AttachmentCategory,
    /// Where the local sink wrote the payload, if it ran and succeeded.
    pub local_path: Option<PathBuf>,
    /// Local sink failure, captured instead of aborting the remote attempt.
    pub local_error: Option<String>,
    /// Shareable link, if the remote sink ran and succeeded.
    pub cloud_link: Option<String>,
    /// Remote routing/upload failure, captured independently of the local sink.
    pub cloud_error: Option<String>,
    /// Routing flags in effect when the attachment was processed.
    pub local_enabled: bool,
    pub cloud_enabled: bool,
}
