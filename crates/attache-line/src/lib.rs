// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API channel for the Attache archiving bot.
//!
//! Receives webhook deliveries, verifies their signatures, maps events onto
//! the domain, drives the upload orchestrator, and talks back to the LINE
//! platform (replies, content downloads, profile lookups).

pub mod client;
pub mod commands;
pub mod events;
pub mod signature;
pub mod webhook;

pub use client::LineClient;
pub use commands::{Command, CommandContext, HELP_TEXT, outcome_reply};
pub use events::{InboundEvent, WebhookEvent, WebhookPayload};
pub use signature::verify_signature;
pub use webhook::{WebhookState, build_router};
