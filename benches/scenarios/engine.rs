//! Benchmarks for the whole engine.
//!
//! The demo song plays through the transport, scheduler and mixer. Blocks
//! are rendered back to back, so the cost includes building note graphs as
//! steps fire and retiring them afterwards.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepsynth::mixer::ChannelUpdate;
use stepsynth::sequencing::demo_song;
use stepsynth::{Engine, EngineConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn playing_engine() -> Engine {
    let config = EngineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_noise_seed(3);
    let mut engine = Engine::new(config);
    if let Err(err) = engine.load_song(&demo_song()) {
        panic!("demo song failed to load: {err}");
    }
    engine.start();
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size];

        let mut engine = playing_engine();
        group.bench_with_input(BenchmarkId::new("demo_song", size), &size, |b, _| {
            b.iter(|| engine.process_block(black_box(&mut out)))
        });

        // Delay on every channel keeps the strips busy
        let mut engine = playing_engine();
        for voice in 0..stepsynth::NUM_VOICES {
            let update = ChannelUpdate {
                delay_enabled: Some(true),
                delay_feedback: Some(0.4),
                delay_mix: Some(0.3),
                ..Default::default()
            };
            if let Err(err) = engine.update_channel(voice, update) {
                panic!("channel update failed: {err}");
            }
        }
        group.bench_with_input(BenchmarkId::new("demo_song_delays", size), &size, |b, _| {
            b.iter(|| engine.process_block(black_box(&mut out)))
        });
    }

    group.finish();
}
