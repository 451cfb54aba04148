// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Attache archiving bot.
//!
//! This crate provides the error type, shared data model, and the adapter
//! traits implemented by the messaging-platform and remote-storage crates.
//! The orchestration core (`attache-archive`) depends only on what is
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AttacheError;
pub use traits::{MessageTransport, RemoteFolder, RemoteStore};
pub use types::{
    AttachmentCategory, AttachmentEvent, ConversationConfig, ConversationKey, ConversationKind,
    UploadOutcome, UploadRecord,
};
