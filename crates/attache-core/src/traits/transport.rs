// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging-platform transport trait implemented by the LINE client.

use async_trait::async_trait;

use crate::error::AttacheError;
use crate::types::{ConversationKey, ConversationKind};

/// The slice of the messaging platform the orchestrator depends on.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Fetches the full payload of an attachment by its platform content id.
    ///
    /// A failure here aborts the attachment before any sink runs.
    async fn fetch_content(&self, content_id: &str) -> Result<Vec<u8>, AttacheError>;

    /// Human-readable name of the conversation, used as the storage folder.
    ///
    /// Implementations apply their own fallback (never fail): an unresolvable
    /// group becomes `group-<id>`, direct chats use a fixed label.
    async fn conversation_display_name(
        &self,
        key: &ConversationKey,
        kind: ConversationKind,
    ) -> String;

    /// Display name of the sender, used as the filename prefix.
    ///
    /// Falls back to a fixed label when the profile cannot be resolved.
    async fn sender_display_name(
        &self,
        key: &ConversationKey,
        kind: ConversationKind,
        sender_id: &str,
    ) -> String;
}
