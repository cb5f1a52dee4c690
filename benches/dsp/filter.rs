//! Benchmarks for state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::filter::SVFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, filter) in [
            ("lowpass", SVFilter::lowpass(1000.0).with_q(8.0)),
            ("highpass", SVFilter::highpass(1000.0)),
            ("bandpass", SVFilter::bandpass(1800.0).with_q(0.8)),
        ] {
            let mut filter = filter;
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }

        // Cutoff recomputed every sample, as under a filter envelope
        let cutoffs: Vec<f32> = (0..size).map(|i| 800.0 + 10.0 * i as f32).collect();
        let mut filter = SVFilter::lowpass(800.0).with_q(8.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render_modulated(black_box(&mut buffer), black_box(&cutoffs), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
