// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock remote object store for deterministic testing.
//!
//! Tracks every folder and file created, counts upload attempts, and can be
//! scripted to fail a number of uploads transiently, so retry-policy tests
//! run without a network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use attache_core::{AttacheError, RemoteFolder, RemoteStore};

/// A file captured by [`MockRemoteStore::create_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub folder_id: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
struct MockFolder {
    id: String,
    name: String,
    parent_id: String,
}

/// An in-memory [`RemoteStore`] with scripted failures.
#[derive(Debug, Default)]
pub struct MockRemoteStore {
    folders: Mutex<Vec<MockFolder>>,
    files: Mutex<Vec<MockFile>>,
    shared: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    folder_creates: AtomicUsize,
    upload_attempts: AtomicUsize,
    transient_failures_left: AtomicUsize,
    fail_share: AtomicBool,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` `create_file` calls fail with a transient error.
    pub fn fail_uploads_transiently(&self, n: usize) {
        self.transient_failures_left.store(n, Ordering::SeqCst);
    }

    /// Makes `share_public` fail with a non-transient error.
    pub fn fail_share(&self) {
        self.fail_share.store(true, Ordering::SeqCst);
    }

    /// Number of `create_file` calls, including failed attempts.
    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    /// Number of folders created (listing hits do not count).
    pub fn folder_creates(&self) -> usize {
        self.folder_creates.load(Ordering::SeqCst)
    }

    /// Snapshot of successfully uploaded files, in upload order.
    pub fn files(&self) -> Vec<MockFile> {
        self.files.lock().expect("mock store poisoned").clone()
    }

    /// File ids that were granted public access.
    pub fn shared_ids(&self) -> Vec<String> {
        self.shared.lock().expect("mock store poisoned").clone()
    }

    fn mint_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n}")
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn list_folders(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Vec<RemoteFolder>, AttacheError> {
        let folders = self.folders.lock().expect("mock store poisoned");
        Ok(folders
            .iter()
            .filter(|f| f.name == name && f.parent_id == parent_id)
            .map(|f| RemoteFolder {
                id: f.id.clone(),
                name: f.name.clone(),
            })
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, AttacheError> {
        self.folder_creates.fetch_add(1, Ordering::SeqCst);
        let id = self.mint_id("folder");
        self.folders
            .lock()
            .expect("mock store poisoned")
            .push(MockFolder {
                id: id.clone(),
                name: name.to_string(),
                parent_id: parent_id.to_string(),
            });
        Ok(id)
    }

    async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        folder_id: &str,
        bytes: &[u8],
    ) -> Result<String, AttacheError> {
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);

        let left = self.transient_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.transient_failures_left.store(left - 1, Ordering::SeqCst);
            return Err(AttacheError::RemoteTransient {
                message: "scripted connection failure".into(),
                source: None,
            });
        }

        let id = self.mint_id("file");
        self.files
            .lock()
            .expect("mock store poisoned")
            .push(MockFile {
                id: id.clone(),
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                folder_id: folder_id.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(id)
    }

    async fn share_public(&self, file_id: &str) -> Result<(), AttacheError> {
        if self.fail_share.load(Ordering::SeqCst) {
            return Err(AttacheError::Remote {
                message: "scripted permission failure".into(),
                source: None,
            });
        }
        self.shared
            .lock()
            .expect("mock store poisoned")
            .push(file_id.to_string());
        Ok(())
    }

    fn file_link(&self, file_id: &str) -> String {
        format!("https://drive.google.com/file/d/{file_id}/view?usp=sharing")
    }
}
