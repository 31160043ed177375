//! Benchmarks for the chatflat pipeline and its steps.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- render`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatflat::core::entity::render_text;
use chatflat::core::filter::MessageFilter;
use chatflat::core::line::build_lines;
use chatflat::message::{Message, TextEntity, TextPart};
use chatflat::pipeline::Pipeline;

use chrono::{Duration, NaiveDate};

// =============================================================================
// Test Data Generators
// =============================================================================

fn date_for(i: usize) -> String {
    let base = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    (base + Duration::minutes(i as i64))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn generate_export_json(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let message = match i % 4 {
            0 => format!(
                r#"{{"id": {}, "type": "message", "date": "{}", "from": "Alice", "text": "Message number {}"}}"#,
                i,
                date_for(i),
                i
            ),
            1 => format!(
                r#"{{"id": {}, "type": "message", "date": "{}", "from": "Bob", "text": ["See ", {{"type": "text_link", "text": "docs", "href": "https://example.com/{}"}}, " and ", {{"type": "bold", "text": "ship"}}]}}"#,
                i,
                date_for(i),
                i
            ),
            2 => format!(
                r#"{{"id": {}, "type": "message", "date": "{}", "from": "Alice", "text": "line one\nline two {}"}}"#,
                i,
                date_for(i),
                i
            ),
            _ => format!(
                r#"{{"id": {}, "type": "service", "date": "{}", "actor": "Bob", "action": "pin_message", "text": ""}}"#,
                i,
                date_for(i)
            ),
        };
        messages.push(message);
    }
    format!(
        r#"{{"name": "Bench Chat", "type": "private_group", "messages": [{}]}}"#,
        messages.join(",\n")
    )
}

fn generate_messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            Message::new()
                .with_kind("message")
                .with_date(date_for(i))
                .with_text(vec![
                    TextPart::from("Message "),
                    TextEntity::new("bold", i.to_string()).into(),
                    TextPart::from(" about "),
                    TextEntity::new("hashtag", if i % 2 == 0 { "#rust" } else { "#java" }).into(),
                ])
        })
        .collect()
}

// =============================================================================
// Pipeline Benchmarks
// =============================================================================

fn bench_pipeline_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_run");
    let pipeline = Pipeline::new();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let json = generate_export_json(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let lines = pipeline.run(black_box(json), None).unwrap();
                black_box(lines)
            });
        });
    }

    group.finish();
}

fn bench_pipeline_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_filtered");
    let pipeline = Pipeline::new();
    let filter = MessageFilter::new()
        .with_date_from("2024-01-16")
        .unwrap()
        .with_keyword("docs")
        .with_exclude_keyword("draft");

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let json = generate_export_json(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let lines = pipeline.run(black_box(json), Some(&filter)).unwrap();
                black_box(lines)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Step Benchmarks
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [100_usize, 1_000, 10_000, 100_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("render_text", size), &messages, |b, messages| {
            b.iter(|| {
                for msg in messages {
                    black_box(render_text(msg.text.as_ref()));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("build_lines", size), &messages, |b, messages| {
            b.iter(|| black_box(build_lines(black_box(messages))));
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let filter = MessageFilter::new()
        .with_keyword("#rust")
        .with_predicate(|m: &Message| m.kind() == "message");

    for size in [100_usize, 1_000, 10_000, 100_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| black_box(filter.filter_all(black_box(messages))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_run,
    bench_pipeline_filtered,
    bench_render,
    bench_filter,
);
criterion_main!(benches);
