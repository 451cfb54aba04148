// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory upload ledger.
//!
//! Ordered records of every processed attachment, keyed by
//! (conversation, category). Process-lifetime state: the ledger is owned by
//! the orchestrator and mutated only while the upload lock is held.

use std::collections::HashMap;

use attache_core::{AttachmentCategory, ConversationKey, UploadRecord};

/// Append-only record store for processed attachments.
#[derive(Debug, Default)]
pub struct UploadLedger {
    entries: HashMap<(ConversationKey, AttachmentCategory), Vec<UploadRecord>>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the (key, category) sequence, preserving arrival order.
    pub fn append(
        &mut self,
        key: ConversationKey,
        category: AttachmentCategory,
        record: UploadRecord,
    ) {
        self.entries.entry((key, category)).or_default().push(record);
    }

    /// Names already recorded for a (key, category) sequence, in arrival order.
    /// The uniquifier de-duplicates new candidates against this list.
    pub fn names(&self, key: &ConversationKey, category: AttachmentCategory) -> Vec<String> {
        self.records(key, category)
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    /// Records for a (key, category) sequence; empty when none were processed.
    pub fn records(&self, key: &ConversationKey, category: AttachmentCategory) -> &[UploadRecord] {
        self.entries
            .get(&(key.clone(), category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of records across all conversations and categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: &str) -> UploadRecord {
        UploadRecord {
            name: name.to_string(),
            uploaded_at: Utc::now(),
            cloud_link: None,
            remote_file_id: None,
        }
    }

    #[test]
    fn records_keep_arrival_order_per_key_and_category() {
        let mut ledger = UploadLedger::new();
        let key = ConversationKey("G1".into());

        ledger.append(key.clone(), AttachmentCategory::Image, record("a.jpg"));
        ledger.append(key.clone(), AttachmentCategory::Image, record("b.jpg"));
        ledger.append(key.clone(), AttachmentCategory::Video, record("c.mp4"));

        assert_eq!(
            ledger.names(&key, AttachmentCategory::Image),
            vec!["a.jpg", "b.jpg"]
        );
        assert_eq!(ledger.names(&key, AttachmentCategory::Video), vec!["c.mp4"]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn unknown_key_yields_empty_slice() {
        let ledger = UploadLedger::new();
        let key = ConversationKey("nobody".into());
        assert!(ledger.records(&key, AttachmentCategory::Document).is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn categories_are_isolated_within_a_conversation() {
        let mut ledger = UploadLedger::new();
        let key = ConversationKey("U1".into());

        ledger.append(key.clone(), AttachmentCategory::Image, record("x.jpg"));

        assert!(ledger.records(&key, AttachmentCategory::Document).is_empty());
        assert_eq!(ledger.records(&key, AttachmentCategory::Image).len(), 1);
    }
}
