use stepsynth::sequencing::{demo_song, Note, Pattern};
use stepsynth::{Engine, EngineConfig};

fn config() -> EngineConfig {
    EngineConfig::default()
        .with_sample_rate(22_050.0)
        .with_noise_seed(42)
}

fn render(engine: &mut Engine, seconds: f64) -> Vec<f32> {
    let mut out = vec![0.0f32; (seconds * engine.config().sample_rate as f64) as usize];
    for block in out.chunks_mut(256) {
        engine.process_block(block);
    }
    out
}

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

#[test]
fn renders_silence_before_start() {
    let mut engine = Engine::new(config());
    engine.load_song(&demo_song()).unwrap();
    let out = render(&mut engine, 0.5);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn demo_song_is_audible_and_finite() {
    let mut engine = Engine::new(config());
    engine.load_song(&demo_song()).unwrap();
    engine.start();

    let out = render(&mut engine, 2.0);
    assert!(out.iter().all(|s| s.is_finite()));
    assert!(peak(&out) > 0.01);
}

#[test]
fn stop_lets_notes_ring_out_then_goes_quiet() {
    let mut engine = Engine::new(config());
    let mut pattern = Pattern::new();
    pattern.voices[0].set(3, 0, Note::on().with_length(2));
    engine.session_mut().song_mode = false;
    engine.session_mut().working = pattern;
    engine.start();

    let head = render(&mut engine, 0.1);
    assert!(peak(&head) > 0.01);

    engine.stop();
    let _ = render(&mut engine, 0.5);
    assert_eq!(engine.scheduled_count(), 0);
    let tail = render(&mut engine, 0.2);
    assert!(peak(&tail) < 1e-4);
}

#[test]
fn same_seed_renders_identically() {
    let mut first = Engine::new(config());
    let mut second = Engine::new(config());
    for engine in [&mut first, &mut second] {
        engine.load_song(&demo_song()).unwrap();
        engine.start();
    }
    assert_eq!(render(&mut first, 1.0), render(&mut second, 1.0));
}
