//! Benchmarks for the delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::delay::{delay_frames, DelayLine};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let frames = delay_frames(0.25, SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        let mut line = DelayLine::new(SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                line.render(black_box(&mut buffer), black_box(frames));
            })
        });

        // Feedback loop as the channel strip runs it
        let mut line = DelayLine::new(SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("feedback", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    let delayed = line.read(frames);
                    line.write(*sample + delayed * 0.3);
                    *sample += delayed * 0.3;
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
