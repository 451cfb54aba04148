// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the platform and storage integrations.

pub mod remote;
pub mod transport;

pub use remote::{RemoteFolder, RemoteStore};
pub use transport::MessageTransport;
