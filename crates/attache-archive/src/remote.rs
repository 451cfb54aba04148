// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote sink: folder resolution and upload with bounded retry.
//!
//! Operates over the [`RemoteStore`] trait so the policy here is independent
//! of the Drive wire layer and testable against a mock store.

use std::time::Duration;

use attache_core::{AttacheError, RemoteStore};
use tracing::{debug, warn};

/// Returns the id of the folder named `name` under `parent_id`, creating it
/// when absent.
///
/// When duplicate folders exist (created out-of-band), the earliest-created
/// one wins; the store lists in creation order. Each call re-queries the
/// backend. No caching across attachments: a folder renamed or trashed
/// between uploads is picked up on the next call.
pub async fn resolve_folder(
    store: &dyn RemoteStore,
    name: &str,
    parent_id: &str,
) -> Result<String, AttacheError> {
    let existing = store.list_folders(name, parent_id).await?;
    if let Some(folder) = existing.first() {
        debug!(name, parent_id, folder_id = %folder.id, "reusing existing remote folder");
        return Ok(folder.id.clone());
    }

    let id = store.create_folder(name, parent_id).await?;
    debug!(name, parent_id, folder_id = %id, "created remote folder");
    Ok(id)
}

/// Uploads payloads to a resolved remote folder, retrying transient
/// transport failures with a fixed delay, then grants public read access.
#[derive(Debug, Clone)]
pub struct RemoteSink {
    max_attempts: u32,
    retry_delay: Duration,
}

impl Default for RemoteSink {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RemoteSink {
    /// `max_attempts` counts all tries including the first; must be >= 1
    /// (enforced at the config boundary).
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }

    /// Uploads `bytes` as `name` into `folder_id` and returns
    /// `(file_id, public_link)`.
    ///
    /// Only transient errors are retried, and each attempt re-sends the
    /// complete payload from the start. Non-transient errors and a failed
    /// permission grant surface immediately; the grant is not retried.
    pub async fn upload(
        &self,
        store: &dyn RemoteStore,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
        folder_id: &str,
    ) -> Result<(String, String), AttacheError> {
        let mut attempt = 1u32;
        let file_id = loop {
            match store.create_file(name, mime_type, folder_id, bytes).await {
                Ok(id) => break id,
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "transient upload failure, retrying after delay"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        store.share_public(&file_id).await?;
        let link = store.file_link(&file_id);
        debug!(name, file_id = %file_id, "remote upload complete");
        Ok((file_id, link))
    }
}
