//! Song mode end to end: arrangement order, wraparound and tempo.

use stepsynth::sequencing::{DrumPattern, LibraryPattern, Pattern, Session, SongArrangement};
use stepsynth::transport::{RecordingSink, Transport};
use stepsynth::voices::Drum;
use stepsynth::EngineConfig;

/// Pattern whose only hit is `drum` on step 0, so each slot is identifiable.
fn marked(drum: Drum) -> Pattern {
    let mut drums = DrumPattern::new();
    drums.set(drum.index(), 0, true);
    Pattern {
        drums,
        ..Pattern::new()
    }
}

fn session() -> Session {
    let mut session = Session::new(120.0);
    session.library = stepsynth::sequencing::PatternLibrary::from_patterns(vec![
        LibraryPattern::new("A", marked(Drum::Kick)),
        LibraryPattern::new("B", marked(Drum::Snare)),
    ]);
    // Gaps are skipped: A, B, A
    session.arrangement = SongArrangement::from_slots(&[Some(0), None, Some(1), None, Some(0)]);
    session
}

#[test]
fn arrangement_plays_in_order_and_wraps() {
    let config = EngineConfig::default();
    let session = session();
    let mut transport = Transport::new(&config, session.bpm());
    let mut sink = RecordingSink::default();

    transport.start(0.0, &session, &mut sink);
    // Four slots of 16 steps at 0.125 s
    transport.poll(8.0, &session, &mut sink);

    let drums: Vec<Drum> = sink.drums.iter().map(|&(drum, _)| drum).collect();
    assert_eq!(drums, [Drum::Kick, Drum::Snare, Drum::Kick, Drum::Kick]);

    let slots: Vec<Option<usize>> = sink
        .steps
        .iter()
        .filter(|event| event.step == 0)
        .map(|event| event.song_slot)
        .collect();
    assert_eq!(slots, [Some(0), Some(2), Some(4), Some(0)]);
    assert_eq!(sink.steps.last().map(|event| event.loop_count), Some(3));
}

#[test]
fn working_pattern_loops_outside_song_mode() {
    let config = EngineConfig::default();
    let mut session = session();
    session.song_mode = false;
    session.working = marked(Drum::Crash);

    let mut transport = Transport::new(&config, session.bpm());
    let mut sink = RecordingSink::default();
    transport.start(0.0, &session, &mut sink);
    transport.poll(4.0, &session, &mut sink);

    assert_eq!(sink.drums.len(), 2);
    assert!(sink.drums.iter().all(|&(drum, _)| drum == Drum::Crash));
    assert!(sink.steps.iter().all(|event| event.song_slot.is_none()));
    // Second bar starts 2 s after the first, plus lookahead
    let gap = sink.drums[1].1 - sink.drums[0].1;
    assert!((gap - 2.0).abs() < 1e-9);
}
