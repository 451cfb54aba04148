// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Attache integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! a messaging platform or a Drive account.
//!
//! # Components
//!
//! - [`MockTransport`] - messaging transport with pre-loaded payloads
//! - [`MockRemoteStore`] - in-memory remote store with scripted failures

pub mod mock_remote;
pub mod mock_transport;

pub use mock_remote::{MockFile, MockRemoteStore};
pub use mock_transport::MockTransport;
