// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Attache archiving bot.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across all Attache crates.
#[derive(Debug, Error)]
pub enum AttacheError {
    /// Configuration errors (missing credentials, cloud upload without a folder).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local filesystem sink errors. Never retried.
    #[error("local write failed for {path}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transient remote-storage transport errors (connect/timeout class).
    /// Eligible for bounded retry in the remote sink.
    #[error("transient remote error: {message}")]
    RemoteTransient {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-transient remote-storage errors (authorization, quota, bad folder id).
    /// Never retried.
    #[error("remote error: {message}")]
    Remote {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Messaging-platform errors (content fetch failure, reply delivery).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AttacheError {
    /// Whether the remote sink may retry the operation that produced this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, AttacheError::RemoteTransient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_remote_errors_are_retryable() {
        let transient = AttacheError::RemoteTransient {
            message: "connection reset".into(),
            source: None,
        };
        assert!(transient.is_transient());

        let quota = AttacheError::Remote {
            message: "quota exceeded".into(),
            source: None,
        };
        assert!(!quota.is_transient());

        let io = AttacheError::LocalIo {
            path: PathBuf::from("/data/x"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!io.is_transient());
    }

    #[test]
    fn local_io_error_includes_path() {
        let err = AttacheError::LocalIo {
            path: PathBuf::from("/data/G1/images/a.jpg"),
            source: std::io::Error::other("permission denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/G1/images/a.jpg"), "got: {msg}");
    }
}
