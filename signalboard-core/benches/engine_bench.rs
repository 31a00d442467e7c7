//! Criterion benchmarks for signalboard hot paths.
//!
//! Benchmarks:
//! 1. Indicator computation (single indicator and the full suite)
//! 2. Annotation and warm-up filtering
//! 3. Full analysis (annotate, score, transitions)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use signalboard_core::config::{AnalysisConfig, IndicatorParams};
use signalboard_core::data::{synthetic, Timeframe};
use signalboard_core::domain::{Bar, BarSeries};
use signalboard_core::engine::{analyze, annotate, drop_incomplete, IndicatorSuite};
use signalboard_core::indicators::{Ema, Indicator};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    synthetic::generate("BENCH", Timeframe::Day1, n)
}

// ── 1. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    let params = IndicatorParams::default();

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);

        let ema = Ema::new(50);
        group.bench_with_input(BenchmarkId::new("ema_50", bar_count), &bar_count, |b, _| {
            b.iter(|| ema.compute(black_box(&bars)));
        });

        let suite = IndicatorSuite::new(&params);
        group.bench_with_input(
            BenchmarkId::new("full_suite_9", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    for ind in suite.all() {
                        black_box(ind.compute(black_box(&bars)));
                    }
                });
            },
        );
    }

    group.finish();
}

// ── 2. Annotation ────────────────────────────────────────────────────

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    let params = IndicatorParams::default();

    for &bar_count in &[252, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(
            BenchmarkId::new("annotate_and_drop", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| drop_incomplete(annotate(black_box(&bars), black_box(&params))));
            },
        );
    }

    group.finish();
}

// ── 3. Full analysis ─────────────────────────────────────────────────

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let config = AnalysisConfig::default();

    for &bar_count in &[252, 2520] {
        let series = BarSeries::new("BENCH", Timeframe::Day1, make_bars(bar_count));
        group.bench_with_input(BenchmarkId::new("analyze", bar_count), &bar_count, |b, _| {
            b.iter(|| analyze(black_box(&series), black_box(&config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_indicators, bench_annotate, bench_analyze);
criterion_main!(benches);
