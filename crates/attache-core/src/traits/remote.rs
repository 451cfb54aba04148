// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote object-storage trait implemented by the Google Drive client.
//!
//! The orchestration core drives this trait only; retry, folder resolution,
//! and link bookkeeping live above it, so tests can substitute a mock store.

use async_trait::async_trait;

use crate::error::AttacheError;

/// A folder returned by [`RemoteStore::list_folders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFolder {
    pub id: String,
    pub name: String,
}

/// Adapter for a remote object-storage backend.
///
/// Implementations must classify transport-level failures (connect, timeout,
/// TLS) as [`AttacheError::RemoteTransient`] and everything else (authorization,
/// quota, invalid ids) as [`AttacheError::Remote`]; the remote sink retries
/// only the former.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lists non-trashed folders named `name` directly under `parent_id`,
    /// ordered by creation time (earliest first).
    async fn list_folders(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Vec<RemoteFolder>, AttacheError>;

    /// Creates a folder named `name` under `parent_id` and returns its id.
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, AttacheError>;

    /// Uploads `bytes` as a file named `name` into `folder_id` and returns the
    /// new object id. Each call sends the complete payload from the start.
    async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        folder_id: &str,
        bytes: &[u8],
    ) -> Result<String, AttacheError>;

    /// Grants public read-only access to an uploaded object.
    async fn share_public(&self, file_id: &str) -> Result<(), AttacheError>;

    /// Stable shareable link for an object id.
    fn file_link(&self, file_id: &str) -> String;
}
