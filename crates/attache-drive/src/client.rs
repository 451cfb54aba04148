// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Google Drive v3 API.
//!
//! Implements [`RemoteStore`] over reqwest: folder listing/creation, multipart
//! file upload, and public-read permission grants. Retry policy lives above
//! this client in the remote sink; this layer only classifies failures as
//! transient (connect/timeout) or not.

use std::time::Duration;

use async_trait::async_trait;
use attache_core::{AttacheError, RemoteFolder, RemoteStore};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

/// Base URL for Drive metadata operations.
const API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
/// Base URL for Drive media uploads.
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";
/// Drive's folder pseudo-MIME type.
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
/// Boundary for hand-built `multipart/related` upload bodies.
const UPLOAD_BOUNDARY: &str = "attache-drive-upload";

/// Google Drive API client.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    api_base: String,
    upload_base: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileResource>,
}

#[derive(Deserialize)]
struct FileResource {
    id: String,
    #[serde(default)]
    name: String,
}

impl DriveClient {
    /// Creates a Drive client authenticating with a bearer access token.
    pub fn new(access_token: &str) -> Result<Self, AttacheError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| AttacheError::Config(format!("invalid drive access token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AttacheError::Remote {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: API_BASE_URL.to_string(),
            upload_base: UPLOAD_BASE_URL.to_string(),
        })
    }

    /// Overrides the API base URLs (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_urls(mut self, api: String, upload: String) -> Self {
        self.api_base = api;
        self.upload_base = upload;
        self
    }

    /// Reads a response, mapping non-success statuses to non-transient errors
    /// and decoding the body as `T`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, AttacheError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttacheError::Remote {
                message: format!("{context} returned {status}: {body}"),
                source: None,
            });
        }
        let body = response.text().await.map_err(|e| AttacheError::Remote {
            message: format!("{context}: failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| AttacheError::Remote {
            message: format!("{context}: failed to parse response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Maps a reqwest transport error to the Attache error model.
///
/// Connect and timeout failures are the retryable class; everything else
/// surfaces as a non-transient remote error.
fn transport_error(e: reqwest::Error, context: &str) -> AttacheError {
    if e.is_connect() || e.is_timeout() {
        AttacheError::RemoteTransient {
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    } else {
        AttacheError::Remote {
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

/// Escapes a string for interpolation into a Drive query literal.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds the `multipart/related` body Drive expects for metadata + content.
fn multipart_related_body(metadata: &serde_json::Value, mime_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(
        format!(
            "--{UPLOAD_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{UPLOAD_BOUNDARY}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n").as_bytes());
    body
}

#[async_trait]
impl RemoteStore for DriveClient {
    async fn list_folders(
        &self,
        name: &str,
        parent_id: &str,
    ) -> Result<Vec<RemoteFolder>, AttacheError> {
        let query = format!(
            "mimeType = '{FOLDER_MIME}' and trashed = false and name = '{}' and '{}' in parents",
            escape_query(name),
            escape_query(parent_id),
        );

        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .query(&[
                ("q", query.as_str()),
                // Deterministic tie-break when duplicate folders exist:
                // the earliest-created folder is always first.
                ("orderBy", "createdTime"),
                ("fields", "files(id, name)"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, "folder list"))?;

        let list: FileList = Self::parse_response(response, "folder list").await?;
        debug!(name, parent_id, matches = list.files.len(), "listed drive folders");

        Ok(list
            .files
            .into_iter()
            .map(|f| RemoteFolder { id: f.id, name: f.name })
            .collect())
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, AttacheError> {
        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .query(&[("fields", "id")])
            .json(&serde_json::json!({
                "name": name,
                "mimeType": FOLDER_MIME,
                "parents": [parent_id],
            }))
            .send()
            .await
            .map_err(|e| transport_error(e, "folder create"))?;

        let created: FileResource = Self::parse_response(response, "folder create").await?;
        debug!(name, parent_id, folder_id = %created.id, "created drive folder");
        Ok(created.id)
    }

    async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        folder_id: &str,
        bytes: &[u8],
    ) -> Result<String, AttacheError> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id],
        });
        let body = multipart_related_body(&metadata, mime_type, bytes);

        let response = self
            .client
            .post(format!("{}/files", self.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(e, "file upload"))?;

        let created: FileResource = Self::parse_response(response, "file upload").await?;
        debug!(name, folder_id, file_id = %created.id, size = bytes.len(), "uploaded file to drive");
        Ok(created.id)
    }

    async fn share_public(&self, file_id: &str) -> Result<(), AttacheError> {
        let response = self
            .client
            .post(format!("{}/files/{file_id}/permissions", self.api_base))
            .json(&serde_json::json!({
                "type": "anyone",
                "role": "reader",
            }))
            .send()
            .await
            .map_err(|e| transport_error(e, "permission grant"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttacheError::Remote {
                message: format!("permission grant returned {status}: {body}"),
                source: None,
            });
        }
        debug!(file_id, "granted public read access");
        Ok(())
    }

    fn file_link(&self, file_id: &str) -> String {
        format!("https://drive.google.com/file/d/{file_id}/view?usp=sharing")
    }
}
