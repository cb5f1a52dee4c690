//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::oscillator::{OscillatorBlock, Wavetable};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
        });

        // Sawtooth - ramp plus one polyBLEP correction
        let mut osc = OscillatorBlock::sawtooth();
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
        });

        // Square - two polyBLEP corrections per sample
        let mut osc = OscillatorBlock::square();
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
        });

        // Triangle - absolute value
        let mut osc = OscillatorBlock::triangle();
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
        });

        // Pulse - interpolated table lookup
        let mut osc = OscillatorBlock::wavetable(Arc::new(Wavetable::pulse(0.25)));
        group.bench_with_input(BenchmarkId::new("pulse_table", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
        });

        // Per-sample frequency, as during a slide
        let frequencies: Vec<f32> = (0..size).map(|i| 110.0 + i as f32).collect();
        let mut osc = OscillatorBlock::sawtooth();
        group.bench_with_input(BenchmarkId::new("sawtooth_modulated", size), &size, |b, _| {
            b.iter(|| osc.render_modulated(black_box(&mut buffer), black_box(&frequencies), SAMPLE_RATE))
        });
    }

    group.finish();
}
