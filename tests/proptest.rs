//! Property-based tests for chatflat.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;
use serde_json::{Value, json};

use chatflat::core::date::{to_date, to_date_code, to_date_time_code};
use chatflat::core::entity::render_text;
use chatflat::core::filter::MessageFilter;
use chatflat::core::line::{build_line, build_lines, flatten_newlines};
use chatflat::message::Message;
use chatflat::pipeline::run;

/// A well-formed export date-time and its expected codes
fn arb_date_time() -> impl Strategy<Value = (String, String, String)> {
    (1970i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| {
            (
                format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}"),
                format!("{y:04}{mo:02}{d:02}"),
                format!("{y:04}{mo:02}{d:02}{h:02}{mi:02}"),
            )
        },
    )
}

/// Generate a random Message using fast strategies (no regex!)
fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop::sample::select(vec!["message", "service", "message", "message"]),
        prop::sample::select(vec![
            "2025-06-24T10:00:00".to_string(),
            "2024-01-15T23:59:59".to_string(),
            "2025-12-31T00:00:00".to_string(),
            "invalid-date".to_string(),
            String::new(),
            "   ".to_string(),
        ]),
        prop::sample::select(vec![
            json!("Hello"),
            json!("Привет мир"),
            json!("multi\nline\r\ntext"),
            json!(""),
            json!("   "),
            json!(["Run ", {"type": "code", "text": "cargo test"}]),
            json!([{"type": "bold", "text": "release"}, " notes"]),
            json!([{"type": "bank_card", "text": "4111"}]),
            json!(["a", 1, null, ["nested"]]),
            Value::Null,
        ]),
    )
        .prop_map(|(kind, date, text)| {
            serde_json::from_value(json!({"type": kind, "date": date, "text": text}))
                .expect("generated message decodes")
        })
}

/// Generate a vector of random messages
fn arb_messages(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message(), 0..max_len)
}

fn document(messages: &[Message]) -> String {
    json!({ "messages": messages }).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // DATE PROPERTIES
    // ============================================

    /// Well-formed date-times produce both codes
    #[test]
    fn valid_dates_produce_codes((raw, date_code, date_time_code) in arb_date_time()) {
        prop_assert_eq!(to_date_code(&raw), date_code);
        prop_assert_eq!(to_date_time_code(&raw), date_time_code);
        prop_assert!(to_date(&raw).is_some());
    }

    /// The date code is blank, the input itself, or eight digits
    #[test]
    fn date_code_shape(raw in "\\PC{0,25}") {
        let code = to_date_code(&raw);
        if raw.trim().is_empty() {
            prop_assert_eq!(code, "");
        } else if to_date(&raw).is_some() {
            prop_assert_eq!(code.len(), 8);
            prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
        } else {
            prop_assert_eq!(code, raw);
        }
    }

    /// The date-time code is empty or twelve digits
    #[test]
    fn date_time_code_shape(raw in "\\PC{0,25}") {
        let code = to_date_time_code(&raw);
        prop_assert!(code.is_empty() || (code.len() == 12 && code.bytes().all(|b| b.is_ascii_digit())));
    }

    // ============================================
    // LINE PROPERTIES
    // ============================================

    /// Flattening removes every line break and keeps the character count
    #[test]
    fn flatten_removes_breaks(text in "[a-z \\r\\n]{0,40}") {
        let flat = flatten_newlines(&text);
        prop_assert!(!flat.contains('\n') && !flat.contains('\r'));
        prop_assert_eq!(flat.chars().count(), text.chars().count());
    }

    /// Every built line is a single line starting with the date code
    #[test]
    fn lines_are_single_line(msg in arb_message()) {
        if let Some(line) = build_line(&msg) {
            prop_assert!(!line.contains('\n') && !line.contains('\r'));
            let prefix = format!("{} ", to_date_code(msg.date_str()));
            prop_assert!(line.starts_with(&prefix));
            prop_assert!(!msg.is_service());
        }
    }

    /// Lines never outnumber messages
    #[test]
    fn build_lines_never_increases_count(messages in arb_messages(20)) {
        prop_assert!(build_lines(&messages).len() <= messages.len());
    }

    // ============================================
    // FILTER PROPERTIES
    // ============================================

    /// No filter means passthrough
    #[test]
    fn empty_filter_is_passthrough(messages in arb_messages(20)) {
        let filtered = MessageFilter::new().filter_all(&messages);
        prop_assert_eq!(filtered.len(), messages.len());
    }

    /// Keyword filter only keeps matching messages
    #[test]
    fn keyword_filter_only_keeps_matching(messages in arb_messages(20)) {
        let filter = MessageFilter::new().with_keyword("RELEASE");
        for msg in filter.filter_all(&messages) {
            prop_assert!(render_text(msg.text.as_ref()).to_lowercase().contains("release"));
        }
    }

    /// Include and exclude of the same keyword keep nothing
    #[test]
    fn contradictory_keywords_keep_nothing(messages in arb_messages(20)) {
        let filter = MessageFilter::new().with_keyword("hello").with_exclude_keyword("hello");
        prop_assert!(filter.filter_all(&messages).is_empty());
    }

    /// Date filter drops every message whose date does not parse
    #[test]
    fn date_filter_requires_parseable_date(messages in arb_messages(20)) {
        let filter = MessageFilter::new().with_date_from("1900-01-01").unwrap();
        for msg in filter.filter_all(&messages) {
            prop_assert!(to_date(msg.date_str()).is_some());
        }
    }

    // ============================================
    // PIPELINE PROPERTIES
    // ============================================

    /// An empty filter is a no-op
    #[test]
    fn run_with_empty_filter_equals_run(messages in arb_messages(20)) {
        let doc = document(&messages);
        prop_assert_eq!(
            run(&doc, None).unwrap(),
            run(&doc, Some(&MessageFilter::new())).unwrap()
        );
    }

    /// Running over a serialized document matches building lines directly
    #[test]
    fn run_matches_build_lines(messages in arb_messages(20)) {
        let doc = document(&messages);
        prop_assert_eq!(run(&doc, None).unwrap(), build_lines(&messages));
    }

    /// Arbitrary JSON never panics the pipeline
    #[test]
    fn run_never_panics(raw in "\\PC{0,60}") {
        let _ = run(&raw, None);
    }
}
