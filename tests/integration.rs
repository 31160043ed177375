//! Integration tests for the pipeline with real files

use std::fs;
use std::sync::Arc;
use std::thread;

use chatflat::core::filter::{FilterParams, MessageFilter};
use chatflat::prelude::*;
use serde_json::json;
use tempfile::tempdir;

fn telegram_export() -> String {
    json!({
        "name": "Team Chat",
        "type": "private_group",
        "id": 123456789,
        "messages": [
            {"id": 1, "type": "message", "date": "2025-06-24T10:00:00", "from": "Alice", "text": "First"},
            {"id": 2, "type": "service", "date": "2025-06-24T11:00:00", "actor": "Bob", "action": "invite_members"},
            {"id": 3, "type": "message", "date": "2025-06-24T13:00:00", "from": "Bob", "text": "Third"}
        ]
    })
    .to_string()
}

fn rich_export() -> String {
    json!({
        "name": "Rich Chat",
        "messages": [
            {
                "id": 10,
                "type": "message",
                "date": "2025-06-20T09:15:00",
                "from": "Alice",
                "text": [
                    "Release ",
                    {"type": "bold", "text": "v1.2"},
                    " is out, see ",
                    {"type": "text_link", "text": "notes", "href": "https://example.com/notes"}
                ],
                "text_entities": [
                    {"type": "plain", "text": "Release "},
                    {"type": "bold", "text": "v1.2"}
                ]
            },
            {
                "id": 11,
                "type": "message",
                "date": "2025-06-22T18:40:00",
                "from": "Bob",
                "reply_to_message_id": 10,
                "text": [
                    {"type": "mention", "text": "@alice"},
                    " run ",
                    {"type": "pre", "text": "cargo test", "language": "bash"}
                ]
            },
            {
                "id": 12,
                "type": "message",
                "date": "2025-06-25T08:00:00",
                "from": "Alice",
                "text": "Draft of\nthe next release"
            },
            {
                "id": 13,
                "type": "message",
                "date": "2025-06-26T08:00:00",
                "from": "Carol",
                "photo": "photos/photo_1@26-06-2025_08-00-00.jpg",
                "text": ""
            }
        ]
    })
    .to_string()
}

// =========================================================================
// End-to-end
// =========================================================================

#[test]
fn test_service_messages_dropped() {
    let lines = Pipeline::new().run(&telegram_export(), None).unwrap();
    assert_eq!(lines, ["20250624 First", "20250624 Third"]);
}

#[test]
fn test_filter_outside_range_yields_nothing() {
    let filter = FilterParams::new().with_start_date("2025-07-01").build().unwrap();
    let lines = Pipeline::new().run(&telegram_export(), filter.as_ref()).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn test_rich_export_rendering() {
    let lines = Pipeline::new().run(&rich_export(), None).unwrap();
    assert_eq!(
        lines,
        [
            "20250620 Release **v1.2** is out, see [notes](https://example.com/notes)",
            "20250622 @alice run ```bash cargo test ```",
            "20250625 Draft of the next release",
        ]
    );
}

#[test]
fn test_filter_params_keywords() {
    let filter = FilterParams::new()
        .with_keywords("release, cargo")
        .with_exclude_keywords("draft")
        .build()
        .unwrap();

    let lines = Pipeline::new().run(&rich_export(), filter.as_ref()).unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("20250620 Release"));
    assert!(lines[1].starts_with("20250622 @alice"));
}

#[test]
fn test_filter_date_range_and_predicate() {
    let filter = MessageFilter::new()
        .with_date_from("2025-06-21")
        .unwrap()
        .with_date_to("2025-06-30")
        .unwrap()
        .with_predicate(|m| m.field("from").and_then(|v| v.as_str()) == Some("Alice"));

    let lines = Pipeline::new().run(&rich_export(), Some(&filter)).unwrap();
    assert_eq!(lines, ["20250625 Draft of the next release"]);
}

#[test]
fn test_empty_filter_equivalent_to_none() {
    for doc in [telegram_export(), rich_export()] {
        let unfiltered = Pipeline::new().run(&doc, None).unwrap();
        let empty = Pipeline::new().run(&doc, Some(&MessageFilter::new())).unwrap();
        assert_eq!(unfiltered, empty);
    }
}

#[test]
fn test_blank_params_mean_no_filter() {
    let params = FilterParams::new().with_keywords("  ").with_start_date("");
    assert!(params.build().unwrap().is_none());
}

#[test]
fn test_invalid_bound_fails_before_processing() {
    let err = FilterParams::new().with_end_date("2025/06/30").build().unwrap_err();
    assert!(err.is_invalid_date_bound());
    assert_eq!(err.code(), "INVALID_DATE_BOUND");
}

#[test]
fn test_stats() {
    let (lines, stats) = Pipeline::new().run_with_stats(&rich_export(), None).unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(stats, ProcessingStats::new(4, 4, 3));
}

// =========================================================================
// File I/O
// =========================================================================

#[test]
fn test_file_to_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("result.json");
    let output = dir.path().join("chatflat_output.txt");
    fs::write(&input, telegram_export()).unwrap();

    let written = Pipeline::new().run_file_to_file(&input, &output, None).unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "20250624 First\n20250624 Third\n"
    );
}

#[test]
fn test_destination_overwritten() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.md");
    fs::write(&output, "previous run\n".repeat(100)).unwrap();

    chatflat::pipeline::run_to_destination(&telegram_export(), &output, None).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 2);
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("secret").join("result.json");

    let err = Pipeline::new().run_file(&missing, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.to_string().contains("secret"));
}

#[test]
fn test_invalid_json_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("result.json");
    fs::write(&input, "{\"messages\": [").unwrap();

    let err = Pipeline::new().run_file(&input, None).unwrap_err();
    assert!(matches!(err, ChatflatError::InvalidDocument { .. }));
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_concurrent_runs_are_deterministic() {
    let pipeline = Arc::new(Pipeline::new());
    let filter = Arc::new(MessageFilter::new().with_keyword("release"));
    let doc = Arc::new(rich_export());
    let expected = pipeline.run(&doc, Some(&*filter)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let filter = Arc::clone(&filter);
            let doc = Arc::clone(&doc);
            thread::spawn(move || pipeline.run(&doc, Some(&*filter)).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// =========================================================================
// Staging
// =========================================================================

#[cfg(feature = "storage")]
mod staging {
    use super::*;
    use chatflat::storage::{CleanupOutcome, FileStorage, ProcessingStatus};

    #[test]
    fn test_upload_process_export() {
        let dir = tempdir().unwrap();
        let storage =
            FileStorage::new(StorageConfig::in_dir(dir.path()), Pipeline::new()).unwrap();

        let id = storage.upload_bytes(rich_export().as_bytes()).unwrap();
        let filter = FilterParams::new().with_keywords("release").build().unwrap();
        let result = storage.process_file(&id, filter.as_ref());

        assert_eq!(result.status, ProcessingStatus::Completed);
        assert_eq!(result.file_id, id);
        assert!(storage.export_file_exists(&id));

        let text = fs::read_to_string(storage.export_file(&id).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));

        // The upload is consumed
        let again = storage.process_file(&id, None);
        assert_eq!(again.status, ProcessingStatus::Failed);
    }

    #[test]
    fn test_fresh_exports_survive_cleanup() {
        let dir = tempdir().unwrap();
        let storage =
            FileStorage::new(StorageConfig::in_dir(dir.path()), Pipeline::new()).unwrap();

        let id = storage.upload_bytes(telegram_export().as_bytes()).unwrap();
        assert!(storage.process_file(&id, None).is_completed());

        assert_eq!(
            storage.cleanup_export_directory(),
            CleanupOutcome::Completed { removed: 0 }
        );
        assert!(storage.export_file_exists(&id));
    }
}
