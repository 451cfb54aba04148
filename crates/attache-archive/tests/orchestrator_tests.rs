// SPDX-FileCopyrightText: 2026 Attache Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the upload orchestrator.
//!
//! Each test builds an isolated orchestrator over a temp directory, a mock
//! transport, and a mock remote store. Tests are independent and
//! order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use attache_archive::{ConversationSettings, RemoteSink, UploadOrchestrator};
use attache_core::{
    AttachmentCategory, AttachmentEvent, ConversationKey, ConversationKind, RemoteStore,
};
use attache_test_utils::{MockRemoteStore, MockTransport};

fn image_event(conversation: &str, content_id: &str) -> AttachmentEvent {
    AttachmentEvent {
        conversation: ConversationKey(conversation.into()),
        kind: ConversationKind::Group,
        sender_id: "U-alice".into(),
        reply_token: None,
        category: AttachmentCategory::Image,
        content_id: content_id.into(),
        file_name: None,
    }
}

fn orchestrator(
    transport: MockTransport,
    remote: Option<Arc<MockRemoteStore>>,
    settings: Arc<ConversationSettings>,
    root: &std::path::Path,
) -> UploadOrchestrator {
    let remote: Option<Arc<dyn RemoteStore>> = remote.map(|r| r as Arc<dyn RemoteStore>);
    UploadOrchestrator::new(Arc::new(transport), remote, settings, root)
        .with_remote_sink(RemoteSink::new(5, Duration::ZERO))
}

// ---- Scenario A: local-only routing ----

#[tokio::test]
async fn local_only_image_lands_on_disk_with_empty_cloud_link() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("img123", b"jpeg-bytes")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = orchestrator(transport, None, settings, tmp.path());

    let outcome = orch.handle(&image_event("G1", "img123")).await.unwrap();

    assert_eq!(outcome.name, "Alice-img123.jpg");
    let expected = tmp.path().join("G1/images/Alice-img123.jpg");
    assert_eq!(outcome.local_path.as_deref(), Some(expected.as_path()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"jpeg-bytes");
    assert!(outcome.cloud_link.is_none());

    let records = orch
        .records(&ConversationKey("G1".into()), AttachmentCategory::Image)
        .await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Alice-img123.jpg");
    assert!(records[0].cloud_link.is_none());
}

// ---- Scenario B: cloud routing resolves conversation and category folders ----

#[tokio::test]
async fn cloud_routing_resolves_folders_and_records_link() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("img123", b"jpeg-bytes")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let remote = Arc::new(MockRemoteStore::new());
    let settings = Arc::new(ConversationSettings::new(Some("P".into())));
    settings
        .enable_cloud(&ConversationKey("G1".into()))
        .await
        .unwrap();

    let orch = orchestrator(transport, Some(remote.clone()), settings, tmp.path());
    let outcome = orch.handle(&image_event("G1", "img123")).await.unwrap();

    // "G1" under "P", then "images" under that.
    assert_eq!(remote.folder_creates(), 2);
    let files = remote.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "Alice-img123.jpg");
    assert_eq!(files[0].mime_type, "image/jpeg");
    assert_eq!(files[0].bytes, b"jpeg-bytes");

    let link = outcome.cloud_link.expect("cloud link should be set");
    assert!(
        link.starts_with("https://drive.google.com/file/d/") && link.ends_with("/view?usp=sharing"),
        "unexpected link: {link}"
    );
    assert_eq!(remote.shared_ids().len(), 1);

    let records = orch
        .records(&ConversationKey("G1".into()), AttachmentCategory::Image)
        .await;
    assert_eq!(records[0].cloud_link.as_deref(), Some(link.as_str()));

    // A second attachment re-resolves but creates nothing new.
    let outcome2 = orch.handle(&image_event("G1", "img123")).await.unwrap();
    assert_eq!(remote.folder_creates(), 2);
    assert_eq!(outcome2.name, "Alice-img123-1.jpg");
}

// ---- Scenario C: identical names are suffixed in arrival order ----

#[tokio::test]
async fn colliding_names_get_counter_suffix_in_arrival_order() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("img123", b"one")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = orchestrator(transport, None, settings, tmp.path());

    let first = orch.handle(&image_event("G1", "img123")).await.unwrap();
    let second = orch.handle(&image_event("G1", "img123")).await.unwrap();
    let third = orch.handle(&image_event("G1", "img123")).await.unwrap();

    assert_eq!(first.name, "Alice-img123.jpg");
    assert_eq!(second.name, "Alice-img123-1.jpg");
    assert_eq!(third.name, "Alice-img123-2.jpg");
    assert!(tmp.path().join("G1/images/Alice-img123-2.jpg").exists());
}

// ---- Hostile names never leave the storage root ----

#[tokio::test]
async fn traversal_document_name_is_contained_in_the_root() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("doc1", b"owned")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = orchestrator(transport, None, settings, tmp.path());

    let event = AttachmentEvent {
        conversation: ConversationKey("G1".into()),
        kind: ConversationKind::Group,
        sender_id: "U-alice".into(),
        reply_token: None,
        category: AttachmentCategory::Document,
        content_id: "doc1".into(),
        file_name: Some("../../../escape.bin".into()),
    };
    let outcome = orch.handle(&event).await.unwrap();

    let path = outcome.local_path.expect("local sink should run");
    assert!(path.starts_with(tmp.path()), "escaped root: {}", path.display());
    assert_eq!(outcome.name, "Alice-.._.._.._escape.bin");
    assert!(tmp.path().join("G1/files/Alice-.._.._.._escape.bin").exists());
    assert!(!tmp.path().parent().unwrap().join("escape.bin").exists());
}

// ---- Ledger guarantees ----

#[tokio::test]
async fn record_is_appended_even_when_both_sinks_are_disabled() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new().with_content("img123", b"x");
    let settings = Arc::new(ConversationSettings::new(None));
    let key = ConversationKey("G1".into());
    settings.set_local_enabled(&key, false).await;

    let orch = orchestrator(transport, None, settings, tmp.path());
    let outcome = orch.handle(&image_event("G1", "img123")).await.unwrap();

    assert!(outcome.local_path.is_none());
    assert!(outcome.cloud_link.is_none());
    assert_eq!(orch.ledger_len().await, 1);
}

#[tokio::test]
async fn fetch_failure_aborts_without_a_ledger_record() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new().with_failing_content("img123");
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = orchestrator(transport, None, settings, tmp.path());

    let err = orch.handle(&image_event("G1", "img123")).await.unwrap_err();
    assert!(err.to_string().contains("img123"));
    assert_eq!(orch.ledger_len().await, 0);
}

// ---- Failure isolation: best-effort both sinks ----

#[tokio::test]
async fn local_failure_does_not_prevent_the_cloud_upload() {
    let tmp = tempfile::tempdir().unwrap();
    // Block the conversation directory with a plain file so the local sink fails.
    std::fs::write(tmp.path().join("G1"), b"blocker").unwrap();

    let transport = MockTransport::new()
        .with_content("img123", b"payload")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let remote = Arc::new(MockRemoteStore::new());
    let settings = Arc::new(ConversationSettings::new(Some("P".into())));
    settings
        .enable_cloud(&ConversationKey("G1".into()))
        .await
        .unwrap();

    let orch = orchestrator(transport, Some(remote.clone()), settings, tmp.path());
    let outcome = orch.handle(&image_event("G1", "img123")).await.unwrap();

    assert!(outcome.local_error.is_some());
    assert!(outcome.local_path.is_none());
    assert!(outcome.cloud_link.is_some());
    assert_eq!(remote.files().len(), 1);
    assert_eq!(orch.ledger_len().await, 1);
}

#[tokio::test]
async fn cloud_exhaustion_still_stores_locally_and_records() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("img123", b"payload")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice");
    let remote = Arc::new(MockRemoteStore::new());
    remote.fail_uploads_transiently(10);
    let settings = Arc::new(ConversationSettings::new(Some("P".into())));
    settings
        .enable_cloud(&ConversationKey("G1".into()))
        .await
        .unwrap();

    let orch = orchestrator(transport, Some(remote.clone()), settings, tmp.path());
    let outcome = orch.handle(&image_event("G1", "img123")).await.unwrap();

    assert!(outcome.cloud_error.is_some());
    assert!(outcome.cloud_link.is_none());
    assert!(outcome.local_path.is_some());
    assert_eq!(remote.upload_attempts(), 5);

    let records = orch
        .records(&ConversationKey("G1".into()), AttachmentCategory::Image)
        .await;
    assert_eq!(records.len(), 1);
    assert!(records[0].cloud_link.is_none());
}

// ---- Mutual exclusion ----

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_events_are_fully_serialized() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("c1", b"one")
        .with_content("c2", b"two")
        .with_content("c3", b"three")
        .with_fetch_delay(Duration::from_millis(10));
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = Arc::new(orchestrator(transport, None, settings, tmp.path()));

    let mut handles = Vec::new();
    for (conversation, content) in [("G1", "c1"), ("G2", "c2"), ("G3", "c3")] {
        let orch = orch.clone();
        let event = image_event(conversation, content);
        handles.push(tokio::spawn(async move { orch.handle(&event).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(orch.ledger_len().await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn payload_fetches_never_overlap_under_concurrency() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = Arc::new(
        MockTransport::new()
            .with_content("c1", b"one")
            .with_content("c2", b"two")
            .with_content("c3", b"three")
            .with_content("c4", b"four")
            .with_fetch_delay(Duration::from_millis(10)),
    );
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = Arc::new(UploadOrchestrator::new(
        transport.clone(),
        None,
        settings,
        tmp.path(),
    ));

    let mut handles = Vec::new();
    for (conversation, content) in [("G1", "c1"), ("G2", "c2"), ("G3", "c3"), ("G4", "c4")] {
        let orch = orch.clone();
        let event = image_event(conversation, content);
        handles.push(tokio::spawn(async move { orch.handle(&event).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(transport.max_concurrent_fetches(), 1);
    assert_eq!(orch.ledger_len().await, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ledger_append_order_matches_lock_acquisition_order() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new()
        .with_content("c1", b"same")
        .with_display_name("G1", "G1")
        .with_sender_name("U-alice", "Alice")
        .with_fetch_delay(Duration::from_millis(10));
    let settings = Arc::new(ConversationSettings::new(None));
    let orch = Arc::new(orchestrator(transport, None, settings, tmp.path()));

    // Four colliding events in one conversation. Each handle() picks its name
    // from the ledger contents at lock acquisition, so the i-th acquirer gets
    // suffix i-1 and appends i-th: the recorded sequence is strictly
    // suffix-ascending iff appends happen in acquisition order.
    let mut handles = Vec::new();
    for _ in 0..4 {
        let orch = orch.clone();
        let event = image_event("G1", "c1");
        handles.push(tokio::spawn(async move { orch.handle(&event).await }));
    }
    let mut outcome_names = Vec::new();
    for handle in handles {
        outcome_names.push(handle.await.unwrap().unwrap().name);
    }

    let recorded: Vec<String> = orch
        .records(&ConversationKey("G1".into()), AttachmentCategory::Image)
        .await
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(
        recorded,
        vec![
            "Alice-c1.jpg",
            "Alice-c1-1.jpg",
            "Alice-c1-2.jpg",
            "Alice-c1-3.jpg"
        ]
    );

    // Every task got exactly one of the recorded names.
    let mut sorted_outcomes = outcome_names.clone();
    sorted_outcomes.sort();
    let mut sorted_records = recorded.clone();
    sorted_records.sort();
    assert_eq!(sorted_outcomes, sorted_records);
}
