//! Detection performance benchmarks.
//!
//! Measures sampling, pattern matching and the full detection pipeline
//! across sample sizes and column counts.

use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datefinder::inference::PatternMatcher;
use datefinder::{DateTimeFinder, FormatCatalog, SampleTable, Sampler, SamplerConfig};

/// Generate an event log: id, label, day, start, end, then filler columns.
fn generate_event_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    // Header row
    let mut headers = vec![
        "event_id".to_string(),
        "label".to_string(),
        "day".to_string(),
        "start".to_string(),
        "end".to_string(),
    ];
    headers.extend((5..cols).map(|i| format!("column_{}", i + 1)));
    data.push_str(&headers.join(","));
    data.push('\n');

    // Data rows
    for row in 0..rows {
        let mut cells = vec![
            format!("EV_{:06}", row),
            format!("Category_{}", row % 10),
            format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
            format!("{:02}:{:02}", 6 + row % 6, row % 60),
            format!("{:02}:{:02}", 14 + row % 6, row % 60),
        ];
        cells.extend((5..cols).map(|col| match col % 3 {
            0 => format!("{:.2}", row as f64 * 1.5),
            1 => if row % 2 == 0 { "true".to_string() } else { "false".to_string() },
            _ => format!("{}/{}", row % 31 + 1, col),
        }));
        data.push_str(&cells.join(","));
        data.push('\n');
    }

    data
}

fn sample_of(data: &str, max_rows: usize) -> SampleTable {
    let sampler = Sampler::with_config(SamplerConfig {
        max_rows,
        ..SamplerConfig::default()
    });
    sampler.sample_bytes(data.as_bytes()).unwrap()
}

/// Benchmark sampling rows from in-memory CSV.
fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_event_data(*rows, 10);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let sampler = Sampler::with_config(SamplerConfig {
                max_rows: *rows,
                ..SamplerConfig::default()
            });
            b.iter(|| black_box(sampler.sample_bytes(data.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the regex pre-filter pass alone.
fn bench_pattern_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_matcher");
    let catalog = FormatCatalog::builtin();
    let skip = HashSet::new();

    for rows in [10, 100, 1_000].iter() {
        let sample = sample_of(&generate_event_data(*rows, 10), *rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &sample, |b, sample| {
            let matcher = PatternMatcher::new();
            b.iter(|| black_box(matcher.find_potential_dates(sample, &catalog, &skip)))
        });
    }

    group.finish();
}

/// Benchmark end-to-end detection on samples of various sizes.
fn bench_find_dates(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_dates");
    let finder = DateTimeFinder::new();

    for rows in [10, 100, 1_000].iter() {
        let sample = sample_of(&generate_event_data(*rows, 10), *rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &sample, |b, sample| {
            b.iter(|| black_box(finder.find_dates(sample)))
        });
    }

    group.finish();
}

/// Benchmark detection with varying column counts.
fn bench_column_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_scaling");
    let finder = DateTimeFinder::new();

    let rows = 100;
    for cols in [5, 10, 20, 50].iter() {
        let sample = sample_of(&generate_event_data(rows, *cols), rows);

        group.bench_with_input(BenchmarkId::new("cols", cols), &sample, |b, sample| {
            b.iter(|| black_box(finder.find_dates(sample)))
        });
    }

    group.finish();
}

/// Benchmark the format discovery report.
fn bench_discover_formats(c: &mut Criterion) {
    let finder = DateTimeFinder::new();
    let sample = sample_of(&generate_event_data(100, 10), 100);

    c.bench_function("discover_formats", |b| {
        b.iter(|| black_box(finder.discover_formats(&sample)))
    });
}

criterion_group!(
    benches,
    bench_sample,
    bench_pattern_matcher,
    bench_find_dates,
    bench_column_scaling,
    bench_discover_formats,
);
criterion_main!(benches);
