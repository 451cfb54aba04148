// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./attache.toml` > `~/.config/attache/attache.toml`
//! > `/etc/attache/attache.toml` with environment variable overrides via the
//! `ATTACHE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AttacheConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/attache/attache.toml` (system-wide)
/// 3. `~/.config/attache/attache.toml` (user XDG config)
/// 4. `./attache.toml` (local directory)
/// 5. `ATTACHE_*` environment variables
pub fn load_config() -> Result<AttacheConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttacheConfig::default()))
        .merge(Toml::file("/etc/attache/attache.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("attache/attache.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("attache.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AttacheConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttacheConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AttacheConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AttacheConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ATTACHE_LINE_CHANNEL_SECRET` must map to
/// `line.channel_secret`, not `line.channel.secret`.
fn env_provider() -> Env {
    Env::prefixed("ATTACHE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ATTACHE_DRIVE_DEFAULT_FOLDER_ID -> "drive_default_folder_id"
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("line_", "line.", 1)
            .replacen("drive_", "drive.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("upload_", "upload.", 1);
        mapped.into()
    })
}
