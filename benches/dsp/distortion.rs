//! Benchmarks for the drive waveshaper.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::distortion::WaveShaper;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");
    let shaper = WaveShaper::drive(20.0, 0.5);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("drive", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shaper.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
