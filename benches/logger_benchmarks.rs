//! Criterion benchmarks for logix

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logix::core::{Dispatcher, LogRecord, PatternFormatter, SinkSet, StructuredRecord};
use logix::prelude::*;
use logix::sinks::NullSink;
use std::sync::Arc;

// ============================================================================
// Submission Benchmarks
// ============================================================================

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(1));

    let sinks = SinkSet::new().with_sink(NullSink::new(), LogLevel::Trace);
    let dispatcher = Dispatcher::spawn(sinks, 8192, LogLevel::Trace).expect("spawn worker");

    group.bench_function("async_null_sink", |b| {
        b.iter(|| {
            dispatcher
                .submit(LogRecord::new(LogLevel::Info, "bench", black_box("Benchmark message")))
                .expect("submit");
        });
    });

    group.bench_function("filtered", |b| {
        b.iter(|| {
            dispatcher
                .submit(LogRecord::new(LogLevel::Trace, "bench", black_box("dropped")))
                .expect("submit");
        });
    });

    let inline = Dispatcher::inline(
        SinkSet::new().with_sink(NullSink::new(), LogLevel::Trace),
        LogLevel::Trace,
    );
    group.bench_function("inline_null_sink", |b| {
        b.iter(|| {
            inline
                .submit(LogRecord::new(LogLevel::Info, "bench", black_box("Benchmark message")))
                .expect("submit");
        });
    });

    group.finish();
    let _ = dispatcher.flush();
}

fn bench_concurrent_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_submit");
    group.throughput(Throughput::Elements(400));

    let sinks = SinkSet::new().with_sink(NullSink::new(), LogLevel::Trace);
    let dispatcher = Arc::new(Dispatcher::spawn(sinks, 1024, LogLevel::Trace).expect("spawn worker"));

    group.bench_function("4_threads_x_100", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let dispatcher = Arc::clone(&dispatcher);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            let _ = dispatcher.submit(LogRecord::new(
                                LogLevel::Info,
                                "bench",
                                format!("Message {}", i),
                            ));
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(LogLevel::Warn, "bench", "Disk usage above threshold")
        .with_fields(LogFields::new().with_field("percent", 91).with_field("mount", "/var"));

    let default_pattern = PatternFormatter::default();
    group.bench_function("default_pattern", |b| {
        b.iter(|| black_box(default_pattern.format(black_box(&record))));
    });

    let verbose = PatternFormatter::new("%D %T.%f %z [%P:%t] [%n] [%^%l%$] %v");
    group.bench_function("verbose_pattern", |b| {
        b.iter(|| black_box(verbose.format_line(black_box(&record))));
    });

    group.bench_function("structured_json", |b| {
        b.iter(|| black_box(StructuredRecord::from_record(black_box(&record)).to_json()));
    });

    group.bench_function("record_creation", |b| {
        b.iter(|| black_box(LogRecord::new(LogLevel::Info, "bench", black_box("line\nbreak"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_submit,
    bench_concurrent_submit,
    bench_formatting
);
criterion_main!(benches);
