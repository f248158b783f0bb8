//! Benchmarks for text run interpretation.
//!
//! Benchmark groups:
//! - `content_parse`: Content stream tokenization into events
//! - `interp_execute`: Event dispatch and run placement on pre-parsed events
//! - `interp_pages`: Sequential vs parallel multi-page interpretation

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use textrun_core::api::{interpret_pages, interpret_pages_parallel, page_events};
use textrun_core::font::{FontWidths, WidthTableMetrics};
use textrun_core::interp::{InterpretOptions, TextRunInterpreter};
use textrun_core::parser::ContentParser;

// =============================================================================
// Data Generation
// =============================================================================

/// Generate a text-heavy content stream with `lines` text lines.
///
/// Cycles through the text operators a typical page uses, with graphics
/// operators mixed in that the interpreter ignores.
fn generate_page(lines: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(lines * 64);
    data.extend_from_slice(b"q 1 0 0 1 0 0 cm BT /F1 11 Tf -13.2 TL 72 720 Td\n");

    for i in 0..lines {
        let line = match i % 5 {
            0 => format!("(Line {i} of the generated page) Tj T*\n"),
            1 => format!("[(Kerned) -120 (text {i}) 35 (here)] TJ T*\n"),
            2 => format!("({i} quoted line) '\n"),
            3 => format!("0.5 0.1 (spaced words {i}) \"\n"),
            _ => format!("1 0 0 1 72 {} Tm <48656C6C6F> Tj\n", 720 - (i % 600)),
        };
        data.extend_from_slice(line.as_bytes());
    }

    data.extend_from_slice(b"ET Q\n");
    data
}

fn sample_metrics() -> WidthTableMetrics {
    let widths = ('a'..='z')
        .chain('A'..='Z')
        .enumerate()
        .map(|(i, ch)| (ch, 400.0 + (i % 7) as f64 * 50.0));
    WidthTableMetrics::new().with_font(
        "F1",
        FontWidths::new(widths)
            .with_default_width(500.0)
            .with_vertical_metrics(718.0, -207.0),
    )
}

// =============================================================================
// Benchmark Groups
// =============================================================================

fn bench_content_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_parse");

    for lines in [100usize, 1_000, 10_000] {
        let data = generate_page(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &data, |b, data| {
            b.iter(|| ContentParser::new(black_box(data)).count())
        });
    }

    group.finish();
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("interp_execute");
    let metrics = sample_metrics();

    for lines in [100usize, 1_000, 10_000] {
        let events = page_events(0, &generate_page(lines));

        group.bench_with_input(BenchmarkId::new("zero_metrics", lines), &events, |b, events| {
            b.iter(|| {
                let mut interp = TextRunInterpreter::with_zero_metrics();
                black_box(interp.execute(black_box(events)).map(|runs| runs.len()))
            })
        });

        group.bench_with_input(BenchmarkId::new("width_table", lines), &events, |b, events| {
            b.iter(|| {
                let mut interp = TextRunInterpreter::new(&metrics);
                black_box(interp.execute(black_box(events)).map(|runs| runs.len()))
            })
        });
    }

    group.finish();
}

fn bench_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("interp_pages");
    let metrics = sample_metrics();
    let options = InterpretOptions::default();

    let contents: Vec<Vec<u8>> = (0..64).map(|i| generate_page(200 + i * 10)).collect();
    let pages: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();

    group.bench_function("sequential_64", |b| {
        b.iter(|| interpret_pages(pages.iter().copied(), &metrics, &options).len())
    });

    group.bench_function("parallel_64", |b| {
        b.iter(|| interpret_pages_parallel(&pages, &metrics, &options).len())
    });

    group.finish();
}

criterion_group!(benches, bench_content_parse, bench_execute, bench_pages);
criterion_main!(benches);
