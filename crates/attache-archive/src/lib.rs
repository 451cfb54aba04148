// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload orchestration core for the Attache archiving bot.
//!
//! Everything with real invariants lives here: collision-free naming, the
//! local filesystem sink, remote folder resolution and retrying uploads, the
//! in-memory upload ledger, per-conversation routing settings, and the
//! orchestrator that serializes all of it behind one upload lock.

pub mod browse;
pub mod ledger;
pub mod local;
pub mod naming;
pub mod orchestrator;
pub mod remote;
pub mod settings;

pub use browse::ArchiveBrowser;
pub use ledger::UploadLedger;
pub use local::LocalSink;
pub use naming::{sanitize_component, unique_name};
pub use orchestrator::UploadOrchestrator;
pub use remote::{RemoteSink, resolve_folder};
pub use settings::ConversationSettings;
