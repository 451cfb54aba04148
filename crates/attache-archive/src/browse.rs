// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-and-delete access to the local sink layout.
//!
//! Backs the listing, search, and delete-by-name commands. Operates directly
//! on `<root>/<display name>/<category>/` without going through the
//! orchestrator or its lock: these commands read whatever is on disk at the
//! moment they run.

use std::path::PathBuf;

use attache_core::{AttacheError, AttachmentCategory};
use tracing::info;

use crate::naming::sanitize_component;

const CATEGORIES: [AttachmentCategory; 3] = [
    AttachmentCategory::Image,
    AttachmentCategory::Document,
    AttachmentCategory::Video,
];

/// Browses the archive of one conversation on the local filesystem sink.
#[derive(Debug, Clone)]
pub struct ArchiveBrowser {
    root: PathBuf,
}

impl ArchiveBrowser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Archived filenames per category, sorted, categories without files
    /// omitted. A conversation that never archived anything yields an empty
    /// list, not an error.
    pub async fn list(
        &self,
        display_name: &str,
    ) -> Result<Vec<(AttachmentCategory, Vec<String>)>, AttacheError> {
        let display_name = sanitize_component(display_name);
        let mut groups = Vec::new();
        for category in CATEGORIES {
            let names = self.read_names(&display_name, category).await?;
            if !names.is_empty() {
                groups.push((category, names));
            }
        }
        Ok(groups)
    }

    /// Archived filenames containing `keyword`, grouped like [`list`](Self::list).
    pub async fn search(
        &self,
        display_name: &str,
        keyword: &str,
    ) -> Result<Vec<(AttachmentCategory, Vec<String>)>, AttacheError> {
        let mut groups = self.list(display_name).await?;
        for (_, names) in &mut groups {
            names.retain(|n| n.contains(keyword));
        }
        groups.retain(|(_, names)| !names.is_empty());
        Ok(groups)
    }

    /// Deletes the first archived file named `name`, searching categories in
    /// fixed order, and returns the category it was deleted from. `Ok(None)`
    /// when no category holds a file with that name.
    pub async fn delete(
        &self,
        display_name: &str,
        name: &str,
    ) -> Result<Option<AttachmentCategory>, AttacheError> {
        let display_name = sanitize_component(display_name);
        let name = sanitize_component(name);
        for category in CATEGORIES {
            let path = self
                .root
                .join(&display_name)
                .join(category.subdir())
                .join(&name);
            if tokio::fs::try_exists(&path)
                .await
                .map_err(|e| AttacheError::LocalIo {
                    path: path.clone(),
                    source: e,
                })?
            {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| AttacheError::LocalIo {
                        path: path.clone(),
                        source: e,
                    })?;
                info!(path = %path.display(), "deleted archived file");
                return Ok(Some(category));
            }
        }
        Ok(None)
    }

    async fn read_names(
        &self,
        display_name: &str,
        category: AttachmentCategory,
    ) -> Result<Vec<String>, AttacheError> {
        let dir = self.root.join(display_name).join(category.subdir());
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            // Never archived into this category yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AttacheError::LocalIo {
                    path: dir,
                    source: e,
                });
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| AttacheError::LocalIo {
            path: dir.clone(),
            source: e,
        })? {
            if entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false)
            {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
