// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Drive adapter for the Attache archiving bot.
//!
//! Implements the [`attache_core::RemoteStore`] trait against the Drive v3
//! REST API. The upload retry loop and folder resolution live in
//! `attache-archive`; this crate is the wire layer only.

pub mod client;

pub use client::DriveClient;
