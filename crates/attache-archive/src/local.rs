// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local filesystem sink.
//!
//! Writes payloads under `<root>/<conversation display name>/<category>/`.
//! Listing, search, and delete commands operate directly on this layout, so
//! it must not change.

use std::path::{Path, PathBuf};

use attache_core::{AttacheError, AttachmentCategory};
use tracing::debug;

use crate::naming::sanitize_component;

/// Filesystem sink rooted at a configured data directory.
#[derive(Debug, Clone)]
pub struct LocalSink {
    root: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to `<root>/<display_name>/<category>/<name>`, creating
    /// intermediate directories on demand.
    ///
    /// Both untrusted components are sanitized before joining, so a name
    /// carrying path separators or `..` cannot escape the root. The caller
    /// guarantees `name` is collision-free, so an existing file is never
    /// silently clobbered in practice. IO failures surface as
    /// [`AttacheError::LocalIo`] and are never retried.
    pub async fn store(
        &self,
        display_name: &str,
        category: AttachmentCategory,
        name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, AttacheError> {
        let display_name = sanitize_component(display_name);
        let name = sanitize_component(name);
        let dir = self.root.join(&display_name).join(category.subdir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AttacheError::LocalIo {
                path: dir.clone(),
                source: e,
            })?;

        let path = dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AttacheError::LocalIo {
                path: path.clone(),
                source: e,
            })?;

        debug!(path = %path.display(), size = bytes.len(), "stored attachment locally");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_writes_payload_at_expected_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = LocalSink::new(tmp.path());

        let path = sink
            .store("G1", AttachmentCategory::Image, "Alice-img123.jpg", b"payload")
            .await
            .unwrap();

        assert_eq!(path, tmp.path().join("G1/images/Alice-img123.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn store_is_idempotent_about_existing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = LocalSink::new(tmp.path());

        sink.store("G1", AttachmentCategory::Document, "a.pdf", b"one")
            .await
            .unwrap();
        // Same directory already exists; second write must not fail.
        let path = sink
            .store("G1", AttachmentCategory::Document, "b.pdf", b"two")
            .await
            .unwrap();

        assert_eq!(path, tmp.path().join("G1/files/b.pdf"));
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_the_root() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = LocalSink::new(tmp.path());

        let path = sink
            .store("G1", AttachmentCategory::Document, "../../../escape.bin", b"owned")
            .await
            .unwrap();

        assert!(path.starts_with(tmp.path()), "escaped root: {}", path.display());
        assert_eq!(
            path,
            tmp.path().join("G1/files/.._.._.._escape.bin")
        );
        assert!(!tmp.path().parent().unwrap().join("escape.bin").exists());
    }

    #[tokio::test]
    async fn traversal_display_names_stay_inside_the_root() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = LocalSink::new(tmp.path());

        let path = sink
            .store("../outside", AttachmentCategory::Image, "a.jpg", b"x")
            .await
            .unwrap();

        assert!(path.starts_with(tmp.path()), "escaped root: {}", path.display());
    }

    #[tokio::test]
    async fn unwritable_root_surfaces_local_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where a directory must go makes create_dir_all fail.
        let blocker = tmp.path().join("G1");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let sink = LocalSink::new(tmp.path());
        let err = sink
            .store("G1", AttachmentCategory::Video, "v.mp4", b"x")
            .await
            .unwrap_err();

        assert!(matches!(err, AttacheError::LocalIo { .. }));
    }
}
