/*
  Offline export
  ==============

  Renders a song straight to a buffer, faster than real time, using a plain
  synthesis path: one oscillator per note with a fixed linear envelope, plus
  the drum kit. Voice modulation, channel strips and arpeggios are not part
  of the export.

      filled slot 1      filled slot 2      filled slot 3
  |------------------|------------------|------------------|
   16 steps × 60/bpm/4

  Note envelope:

      0.3 ┤  ┌───────────────┐
          │ ╱                 ╲
        0 ┼─┘                   └
          t  t+10ms   t+dur-50ms  t+dur

  Noise voices export as square waves. Empty slots take no time, and neither
  do slots naming a pattern the library no longer has; the total length is
  playable slots × one pattern loop.
*/

use std::path::Path;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::dsp::automation::ParamTimeline;
use crate::dsp::mix::sum_in_place;
use crate::dsp::noise::NoiseBank;
use crate::dsp::oscillator::{OscillatorWaveform, Wavetable};
use crate::engine::{Destination, Scheduler};
use crate::error::Result;
use crate::graph::envelope::EnvNode;
use crate::graph::oscillator::OscNode;
use crate::graph::{GraphNode, NodeExt, RenderCtx};
use crate::io::wav;
use crate::sequencing::notes::{clamp_octave, shifted_frequency, ROWS};
use crate::sequencing::pattern::Pattern;
use crate::sequencing::song::Song;
use crate::synth::params::PwmSettings;
use crate::synth::WaveType;
use crate::transport::step_interval;
use crate::voices::{self, Drum};
use crate::{MAX_BLOCK_SIZE, NUM_STEPS, NUM_VOICES};

/// Peak level of an exported note.
pub const EXPORT_NOTE_GAIN: f32 = 0.3;
const EXPORT_ATTACK: f64 = 0.01;
const EXPORT_RELEASE: f64 = 0.05;

pub struct Exporter {
    config: EngineConfig,
    channels: u16,
}

impl Exporter {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, channels: 2 }
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels.max(1);
        self
    }

    /// Tempo the song renders at: its own, or the configured default.
    pub fn bpm(&self, song: &Song) -> Result<f64> {
        self.config
            .validate_bpm(song.bpm.unwrap_or(self.config.default_bpm))
    }

    /// Seconds of audio the song renders to.
    pub fn duration(&self, song: &Song) -> Result<f64> {
        let pattern_seconds = NUM_STEPS as f64 * step_interval(self.bpm(song)?);
        Ok(playable_slots(song) as f64 * pattern_seconds)
    }

    /// Mono render of every filled slot, back to back.
    pub fn render(&self, song: &Song) -> Result<Vec<f32>> {
        let bpm = self.bpm(song)?;
        let step = step_interval(bpm);
        let sample_rate = self.config.sample_rate;
        let frames = (self.duration(song)? * sample_rate as f64).ceil() as usize;

        let mut noise = NoiseBank::new(sample_rate, self.config.noise_seed);
        let mut scheduler = Scheduler::new();
        let mut start = 0.0;
        for (slot, index) in song.song_arrangement.filled() {
            let Some(library_pattern) = song.pattern_library.get(index) else {
                log::warn!("slot {slot}: pattern {index} missing, skipped");
                continue;
            };
            self.schedule_pattern(&library_pattern.pattern, song, start, step, &mut noise, &mut scheduler);
            start += NUM_STEPS as f64 * step;
        }
        log::info!(
            "exporting {} graphs over {:.2}s at {bpm} BPM",
            scheduler.len(),
            frames as f64 / sample_rate as f64
        );

        let mut out = vec![0.0f32; frames];
        let mut voice_buffers: [Vec<f32>; NUM_VOICES] = std::array::from_fn(|_| vec![0.0; MAX_BLOCK_SIZE]);
        let mut bus = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut offset = 0;
        while offset < frames {
            let len = (frames - offset).min(MAX_BLOCK_SIZE);
            let ctx = RenderCtx::new(sample_rate, offset as f64 / sample_rate as f64);

            let bus = &mut bus[..len];
            bus.fill(0.0);
            for buffer in voice_buffers.iter_mut() {
                buffer[..len].fill(0.0);
            }
            scheduler.render(&ctx, &mut voice_buffers, bus);
            for buffer in &voice_buffers {
                sum_in_place(bus, &buffer[..len]);
            }
            out[offset..offset + len].copy_from_slice(bus);

            offset += len;
            scheduler.retire(ctx.frame_time(len));
        }
        Ok(out)
    }

    pub fn export_wav(&self, song: &Song, path: impl AsRef<Path>) -> Result<()> {
        let samples = self.render(song)?;
        wav::write_wav_file(path, self.config.sample_rate as u32, self.channels, &samples)
    }

    pub fn export_wav_bytes(&self, song: &Song) -> Result<Vec<u8>> {
        let samples = self.render(song)?;
        wav::wav_bytes(self.config.sample_rate as u32, self.channels, &samples)
    }

    fn schedule_pattern(
        &self,
        pattern: &Pattern,
        song: &Song,
        start: f64,
        step: f64,
        noise: &mut NoiseBank,
        scheduler: &mut Scheduler,
    ) {
        for step_index in 0..NUM_STEPS {
            let when = start + step_index as f64 * step;

            for voice in 0..NUM_VOICES {
                let wave = song.wave_types.get(voice).copied().unwrap_or_default();
                let octave = clamp_octave(song.octaves.get(voice).copied().unwrap_or(0));
                let pwm = song
                    .voice_settings
                    .get(voice)
                    .map(|settings| settings.pwm.clone())
                    .unwrap_or_default();

                for (row, row_note) in ROWS.iter().enumerate() {
                    let note = pattern.voices[voice].rows()[row][step_index];
                    if !note.active {
                        continue;
                    }
                    let duration = step * f64::from(note.length);
                    let hz = shifted_frequency(row_note.hz, octave);
                    let graph = plain_note(wave, &pwm, hz, when, duration);
                    scheduler.schedule(graph, when, when + duration, Destination::Voice(voice));
                }
            }

            for drum in Drum::ALL {
                if pattern.drums.is_active(drum.index(), step_index) {
                    let graph = voices::drum(drum, when, noise);
                    scheduler.schedule(graph, when, when + drum.length(), Destination::Master);
                }
            }
        }
    }
}

fn plain_note(wave: WaveType, pwm: &PwmSettings, hz: f32, when: f64, duration: f64) -> Box<dyn GraphNode> {
    let stop = when + duration;
    let osc = match wave {
        WaveType::Sawtooth => OscNode::fixed(OscillatorWaveform::Sawtooth, hz, when, stop),
        WaveType::Triangle => OscNode::fixed(OscillatorWaveform::Triangle, hz, when, stop),
        WaveType::Pulse => OscNode::wavetable(
            Arc::new(Wavetable::pulse(pwm.pulse_width)),
            ParamTimeline::constant(hz),
            when,
            stop,
        ),
        WaveType::Square | WaveType::Noise => OscNode::fixed(OscillatorWaveform::Square, hz, when, stop),
    };
    osc.amplify(EnvNode::new(plain_envelope(when, duration))).boxed()
}

/// Filled slots whose pattern still resolves.
fn playable_slots(song: &Song) -> usize {
    song.song_arrangement
        .filled()
        .filter(|&(_, index)| index < song.pattern_library.len())
        .count()
}

fn plain_envelope(when: f64, duration: f64) -> ParamTimeline {
    let attack_end = when + EXPORT_ATTACK;
    let hold_end = (when + duration - EXPORT_RELEASE).max(attack_end);
    let mut gain = ParamTimeline::new(0.0);
    gain.set_value_at_time(0.0, when)
        .linear_ramp_to_value_at_time(EXPORT_NOTE_GAIN, attack_end)
        .set_value_at_time(EXPORT_NOTE_GAIN, hold_end)
        .linear_ramp_to_value_at_time(0.0, (when + duration).max(hold_end));
    gain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::arrangement::SongArrangement;
    use crate::sequencing::library::LibraryPattern;
    use crate::sequencing::pattern::Note;

    fn exporter() -> Exporter {
        Exporter::new(EngineConfig {
            sample_rate: 8_000.0,
            noise_seed: Some(5),
            ..Default::default()
        })
    }

    fn song(pattern: Pattern, slots: &[Option<usize>]) -> Song {
        Song {
            bpm: Some(120.0),
            pattern_library: vec![LibraryPattern::new("one", pattern)],
            song_arrangement: SongArrangement::from_slots(slots),
            ..Default::default()
        }
    }

    #[test]
    fn length_counts_filled_slots_only() {
        let song = song(Pattern::new(), &[Some(0), None, Some(0), None]);
        let exporter = exporter();
        assert!((exporter.duration(&song).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(exporter.render(&song).unwrap().len(), 32_000);
    }

    #[test]
    fn dangling_slots_add_no_silence() {
        let song = song(Pattern::new(), &[Some(0), Some(3), Some(0)]);
        let exporter = exporter();
        assert!((exporter.duration(&song).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(exporter.render(&song).unwrap().len(), 32_000);
    }

    #[test]
    fn envelope_rises_holds_and_falls() {
        let gain = plain_envelope(1.0, 0.25);
        assert_eq!(gain.value_at(1.0), 0.0);
        assert!((gain.value_at(1.01) - 0.3).abs() < 1e-6);
        assert!((gain.value_at(1.1) - 0.3).abs() < 1e-6);
        assert!((gain.value_at(1.225) - 0.15).abs() < 1e-4);
        assert_eq!(gain.value_at(1.3), 0.0);
    }

    #[test]
    fn notes_and_drums_land_in_their_slot() {
        let mut pattern = Pattern::new();
        pattern.voices[0].set(0, 0, Note::on().with_length(2));
        pattern.drums.set(Drum::Kick.index(), 8, true);
        let song = song(pattern, &[None, Some(0)]);

        let out = exporter().render(&song).unwrap();
        assert_eq!(out.len(), 16_000);
        let peak = |range: std::ops::Range<usize>| out[range].iter().fold(0.0f32, |a, &x| a.max(x.abs()));

        // The note plays the first two steps, the kick enters on step 8.
        assert!(peak(100..1_900) > 0.2);
        assert!(peak(2_100..7_900) < 1e-6);
        assert!(peak(8_000..9_000) > 0.5);
    }

    #[test]
    fn noise_voice_exports_as_square() {
        let mut pattern = Pattern::new();
        pattern.voices[1].set(3, 0, Note::on().with_length(4));
        let mut song = song(pattern, &[Some(0)]);
        song.wave_types = vec![WaveType::Square, WaveType::Noise, WaveType::Square];

        let out = exporter().render(&song).unwrap();
        // A square at full envelope only ever sits at ±0.3.
        let held = &out[400..3_000];
        assert!(held.iter().all(|&s| (s.abs() - 0.3).abs() < 1e-3 || s.abs() < 0.3));
        assert!(held.iter().filter(|&&s| (s.abs() - 0.3).abs() < 1e-3).count() > held.len() / 2);
    }

    #[test]
    fn out_of_range_tempo_is_an_error() {
        let mut song = song(Pattern::new(), &[Some(0)]);
        song.bpm = Some(20.0);
        assert!(exporter().render(&song).is_err());
    }

    #[test]
    fn wav_bytes_are_stereo() {
        let song = song(Pattern::new(), &[Some(0)]);
        let bytes = exporter().export_wav_bytes(&song).unwrap();
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 2);
        assert_eq!(bytes.len(), 44 + 16_000 * 2 * 2);
    }
}
