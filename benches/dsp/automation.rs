//! Benchmarks for parameter timeline rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::automation::ParamTimeline;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    // Gain envelope shape of a default voice note
    let mut adsr = ParamTimeline::new(0.0);
    adsr.set_value_at_time(0.0, 0.0)
        .linear_ramp_to_value_at_time(0.85, 0.004)
        .exponential_ramp_to_value_at_time(0.6, 0.104)
        .set_value_at_time(0.6, 0.17)
        .exponential_ramp_to_value_at_time(0.01, 0.25);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Block inside the exponential decay
        group.bench_with_input(BenchmarkId::new("adsr_decay", size), &size, |b, _| {
            b.iter(|| adsr.render(black_box(&mut buffer), black_box(0.01), SAMPLE_RATE))
        });

        // Block after the last event (held value)
        group.bench_with_input(BenchmarkId::new("adsr_held", size), &size, |b, _| {
            b.iter(|| adsr.render(black_box(&mut buffer), black_box(1.0), SAMPLE_RATE))
        });
    }

    group.finish();
}
