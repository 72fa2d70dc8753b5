//! Criterion benchmarks for rust_context_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_context_logger::prelude::*;
use tempfile::TempDir;

fn full_context() -> RequestContext {
    ContextKey::BUILT_IN
        .iter()
        .fold(RequestContext::new(), |ctx, key| {
            ctx.with_value(key.clone(), format!("{}-value", key))
        })
}

// ============================================================================
// Context Extraction Benchmarks
// ============================================================================

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    group.throughput(Throughput::Elements(1));

    let registry = ContextKeyRegistry::new();
    let full = full_context();
    let sparse = RequestContext::new().with_value(ContextKey::TRACE_ID, "t-1".to_string());

    group.bench_function("none", |b| {
        b.iter(|| black_box(registry.extract(black_box(None))));
    });

    group.bench_function("one_of_eleven", |b| {
        b.iter(|| black_box(registry.extract(black_box(Some(&sparse)))));
    });

    group.bench_function("eleven_of_eleven", |b| {
        b.iter(|| black_box(registry.extract(black_box(Some(&full)))));
    });

    group.finish();
}

// ============================================================================
// Logger Construction Benchmarks
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("construction.log").display().to_string();

    for mode in ["development", "production"] {
        group.bench_function(mode, |b| {
            b.iter(|| {
                let logger = Logger::builder()
                    .app_mode(mode)
                    .output_paths([log_file.clone()])
                    .build()
                    .expect("Failed to build logger");
                black_box(logger)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("emission.log").display().to_string();
    let ctx = full_context();

    for encoding in [Encoding::Json, Encoding::Console] {
        let logger = Logger::builder()
            .encoding(encoding)
            .output_paths([log_file.clone()])
            .build()
            .expect("Failed to build logger");

        group.bench_function(format!("{}_no_context", encoding), |b| {
            b.iter(|| logger.info(None, black_box("request handled"), &[]));
        });

        group.bench_function(format!("{}_full_context", encoding), |b| {
            b.iter(|| {
                logger.info(
                    Some(&ctx),
                    black_box("request handled"),
                    &[Field::new("status", 200), Field::new("latency_ms", 12.5)],
                )
            });
        });
    }

    let logger = Logger::builder()
        .level("error")
        .output_paths([log_file])
        .build()
        .expect("Failed to build logger");

    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(Some(&ctx), black_box("dropped"), &[]));
    });

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_construction, bench_emission);
criterion_main!(benches);
