// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification.
//!
//! LINE signs each webhook delivery with base64(HMAC-SHA256(channel secret,
//! raw body)) in the `x-line-signature` header. Verification runs on the raw
//! body bytes before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Checks the `x-line-signature` header value against the channel secret.
pub fn verify_signature(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = BASE64.encode(mac.finalize().into_bytes());
    expected == signature
}

/// Computes the signature LINE would send for `body`. Exposed for tests that
/// drive the webhook endpoint directly.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}
