// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload models and conversion into domain events.

use attache_core::{AttachmentCategory, AttachmentEvent, ConversationKey, ConversationKind};
use serde::Deserialize;

/// Top-level webhook delivery: a batch of events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event as delivered by the platform.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: Option<EventMessage>,
}

/// Where the event originated: a group chat or a one-to-one chat.
#[derive(Debug, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
}

/// The message carried by a `message` event.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

/// A webhook event mapped onto the domain.
#[derive(Debug)]
pub enum InboundEvent {
    /// A text message, possibly a `@` command.
    Text {
        conversation: ConversationKey,
        kind: ConversationKind,
        reply_token: Option<String>,
        text: String,
    },
    /// An attachment to archive.
    Attachment(AttachmentEvent),
}

impl WebhookEvent {
    /// Maps the raw event to a domain event.
    ///
    /// Returns `None` for non-message events (follows, joins, postbacks) and
    /// for message types the bot does not archive (stickers, locations).
    pub fn into_inbound(self) -> Option<InboundEvent> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message?;
        let source = self.source?;

        // The conversation key is the group id for group chats, the user id
        // for one-to-one chats.
        let (conversation, kind) = match (&source.group_id, &source.user_id) {
            (Some(group_id), _) => (
                ConversationKey(group_id.clone()),
                ConversationKind::Group,
            ),
            (None, Some(user_id)) => (ConversationKey(user_id.clone()), ConversationKind::Direct),
            (None, None) => return None,
        };
        let sender_id = source.user_id.unwrap_or_default();

        let category = match message.message_type.as_str() {
            "text" => {
                return Some(InboundEvent::Text {
                    conversation,
                    kind,
                    reply_token: self.reply_token,
                    text: message.text.unwrap_or_default(),
                });
            }
            "image" => AttachmentCategory::Image,
            "file" => AttachmentCategory::Document,
            "video" => AttachmentCategory::Video,
            _ => return None,
        };

        Some(InboundEvent::Attachment(AttachmentEvent {
            conversation,
            kind,
            sender_id,
            reply_token: self.reply_token,
            category,
            content_id: message.id,
            file_name: message.file_name,
        }))
    }
}
