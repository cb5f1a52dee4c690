//! Benchmarks for complete note and drum graphs.
//!
//! Each graph is built the way the engine builds it on a trigger, then
//! rendered from its start time so the envelopes are live.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::dsp::noise::NoiseBank;
use stepsynth::graph::RenderCtx;
use stepsynth::synth::{NotePlan, NoteTrigger, VoiceSettings, WaveType};
use stepsynth::voices::{self, Drum};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const TAIL: f64 = 0.02;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE, 0.01);
    let trigger = NoteTrigger::new(0, 110.0, 0.0, WaveType::Sawtooth, 0.125);

    let plain = VoiceSettings::default();

    // Everything switched on: stacked oscillators, vibrato, filter sweep, drive
    let mut heavy = VoiceSettings::default();
    heavy.detune.enabled = true;
    heavy.detune.voices = 4;
    heavy.vibrato.enabled = true;
    heavy.filter_envelope.enabled = true;
    heavy.distortion.enabled = true;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut noise = NoiseBank::new(SAMPLE_RATE, Some(7));

        // === BASELINE NOTE ===
        // oscillator → gain envelope
        let mut note = NotePlan::new(&trigger, &plain, TAIL).build(&mut noise);
        group.bench_with_input(BenchmarkId::new("note_plain", size), &size, |b, _| {
            b.iter(|| note.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // === SLIDE ===
        let slide = trigger.with_slide_from(Some(220.0));
        let mut note = NotePlan::new(&slide, &plain, TAIL).build(&mut noise);
        group.bench_with_input(BenchmarkId::new("note_slide", size), &size, |b, _| {
            b.iter(|| note.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // === FULL CHAIN ===
        let mut note = NotePlan::new(&trigger, &heavy, TAIL).build(&mut noise);
        group.bench_with_input(BenchmarkId::new("note_full_chain", size), &size, |b, _| {
            b.iter(|| note.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // === DRUMS ===
        // Kick is a swept sine; crash is noise through a high-pass
        for drum in [Drum::Kick, Drum::Snare, Drum::Crash] {
            let mut graph = voices::drum(drum, 0.0, &mut noise);
            group.bench_with_input(BenchmarkId::new(drum.name(), size), &size, |b, _| {
                b.iter(|| graph.render_block(black_box(&mut buffer), black_box(&ctx)))
            });
        }
    }

    group.finish();
}
