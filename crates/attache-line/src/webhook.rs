// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The webhook HTTP surface.
//!
//! One POST route receives LINE webhook deliveries: the raw body is
//! signature-checked before parsing, then each event is dispatched in order.
//! Command replies are always sent; attachment outcome replies respect the
//! conversation's reply toggle. A GET /health route answers liveness probes.

use std::sync::Arc;

use attache_archive::{ArchiveBrowser, ConversationSettings, UploadOrchestrator};
use attache_core::MessageTransport;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use tracing::{debug, error, warn};

use crate::client::LineClient;
use crate::commands::{Command, CommandContext, outcome_reply};
use crate::events::{InboundEvent, WebhookEvent, WebhookPayload};
use crate::signature::verify_signature;

/// Shared state behind the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub orchestrator: Arc<UploadOrchestrator>,
    pub settings: Arc<ConversationSettings>,
    pub browser: Arc<ArchiveBrowser>,
    pub client: Arc<LineClient>,
    pub channel_secret: String,
}

/// Builds the router serving the webhook at `webhook_path` plus /health.
pub fn build_router(webhook_path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(webhook_path, post(handle_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn handle_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let Some(signature) = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
    else {
        warn!("webhook delivery without a signature header");
        return StatusCode::BAD_REQUEST;
    };
    if !verify_signature(&state.channel_secret, signature, &body) {
        warn!("webhook delivery with an invalid signature");
        return StatusCode::BAD_REQUEST;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "webhook delivery with an unparseable body");
            return StatusCode::BAD_REQUEST;
        }
    };

    for event in payload.events {
        dispatch(&state, event).await;
    }
    StatusCode::OK
}

/// Routes one webhook event. Never fails the delivery: per-event errors are
/// logged (and surfaced to the chat when replies are on) so one bad event
/// cannot make the platform redeliver the whole batch.
async fn dispatch(state: &WebhookState, event: WebhookEvent) {
    let Some(inbound) = event.into_inbound() else {
        return;
    };

    match inbound {
        InboundEvent::Text {
            conversation,
            kind,
            reply_token,
            text,
        } => {
            let Some(parsed) = Command::parse(&text) else {
                return;
            };
            let reply = match parsed {
                Ok(command) => {
                    // Browse commands locate the archive by display name; the
                    // lookup round trip is skipped for everything else.
                    let display_name = if matches!(
                        command,
                        Command::List | Command::Search(_) | Command::Delete(_)
                    ) {
                        state
                            .client
                            .conversation_display_name(&conversation, kind)
                            .await
                    } else {
                        String::new()
                    };
                    let ctx = CommandContext {
                        settings: &state.settings,
                        browser: &state.browser,
                        key: &conversation,
                        display_name: &display_name,
                    };
                    command.apply(&ctx).await
                }
                Err(usage) => usage,
            };
            send_reply(state, reply_token.as_deref(), &reply).await;
        }
        InboundEvent::Attachment(attachment) => {
            let conversation = attachment.conversation.clone();
            let reply_token = attachment.reply_token.clone();
            let reply = match state.orchestrator.handle(&attachment).await {
                Ok(outcome) => outcome_reply(&outcome),
                Err(e) => {
                    error!(%conversation, error = %e, "attachment processing failed");
                    format!("Could not archive the attachment: {e}")
                }
            };
            if state.settings.get(&conversation).await.reply_enabled {
                send_reply(state, reply_token.as_deref(), &reply).await;
            } else {
                debug!(%conversation, "replies are off, outcome not announced");
            }
        }
    }
}

async fn send_reply(state: &WebhookState, reply_token: Option<&str>, text: &str) {
    let Some(token) = reply_token else {
        return;
    };
    if let Err(e) = state.client.reply(token, text).await {
        warn!(error = %e, "reply delivery failed");
    }
}
