//! Benchmarks for signal mixing operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Generate test signals
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();

        // Sum onto a bus (every voice and drum lands this way)
        let mut bus = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("sum_in_place", size), &size, |b, _| {
            b.iter(|| {
                bus.copy_from_slice(&signal_a);
                mix::sum_in_place(black_box(&mut bus), black_box(&signal_b));
            })
        });

        // Weighted send (delay wet path)
        let mut bus = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("sum_scaled_in_place", size), &size, |b, _| {
            b.iter(|| {
                bus.copy_from_slice(&signal_a);
                mix::sum_scaled_in_place(black_box(&mut bus), black_box(&signal_b), black_box(0.3));
            })
        });

        // Fixed gain (channel and master volume)
        let mut bus = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("scale_in_place", size), &size, |b, _| {
            b.iter(|| {
                bus.copy_from_slice(&signal_a);
                mix::scale_in_place(black_box(&mut bus), black_box(0.3));
            })
        });

        // Per-sample gain (rendered envelope)
        let mut bus = signal_a.clone();
        group.bench_with_input(BenchmarkId::new("multiply_in_place", size), &size, |b, _| {
            b.iter(|| {
                bus.copy_from_slice(&signal_a);
                mix::multiply_in_place(black_box(&mut bus), black_box(&signal_b));
            })
        });
    }

    group.finish();
}
