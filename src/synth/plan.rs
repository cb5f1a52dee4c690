//! Note planning: voice settings in, transient graph out.
//!
//! A [`NotePlan`] is the complete description of one note before any audio
//! object exists: every automation timeline, the oscillator stack, the
//! optional filter sweep and drive, and the time the note's sources stop.
//! Planning reads the voice settings once, so a settings change after the
//! trigger never reaches a note that is already scheduled.
//!
//! ```text
//!   oscillators ──┬─ detune layers (1/√N) ─→ [filter sweep] ─→ [drive] ─→ gain env ─→ channel
//!   noise ────────┴──────────────────────────────────────────────────────→ gain env ─→ channel
//! ```

use std::sync::Arc;

use crate::dsp::automation::ParamTimeline;
use crate::dsp::filter::FilterType;
use crate::dsp::noise::NoiseBank;
use crate::dsp::oscillator::{OscillatorShape, OscillatorWaveform, Wavetable};
use crate::graph::distortion::ShaperNode;
use crate::graph::envelope::EnvNode;
use crate::graph::filter::FilterNode;
use crate::graph::mix::Layer;
use crate::graph::noise::NoiseNode;
use crate::graph::oscillator::{OscNode, Vibrato};
use crate::graph::{GraphNode, NodeExt};
use crate::synth::params::{AdsrSettings, FilterEnvelopeSettings, VoiceSettings, WaveType};
use crate::synth::NoteTrigger;
use crate::MIN_FILTER_FREQ;

/// Peak gain of an unaccented note.
pub const PEAK_GAIN: f32 = 0.85;
/// Gain multiplier for an accented step.
pub const ACCENT_GAIN: f32 = 1.3;
/// Filter sweep multiplier for an accented step.
pub const ACCENT_SWEEP: f32 = 1.5;
/// Cutoff range covered by a filter envelope at amount 1.
pub const FILTER_SWEEP_HZ: f32 = 8_000.0;
pub const FILTER_ENVELOPE_Q: f32 = 8.0;
/// Lowest level the gain envelope ramps toward.
pub const GAIN_FLOOR: f32 = 0.01;
/// Glide time of a slide.
pub const SLIDE_TIME: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceWaveform {
    Basic(OscillatorWaveform),
    /// Band-limited pulse with the given duty cycle.
    Pulse { width: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratoPlan {
    pub rate_hz: f32,
    pub depth_cents: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrivePlan {
    pub amount: f32,
    pub mix: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoteSource {
    Oscillators {
        waveform: SourceWaveform,
        frequency: ParamTimeline,
        /// One entry per layer; a single `0.0` when detune is off.
        detune_cents: Vec<f32>,
        vibrato: Option<VibratoPlan>,
    },
    /// Fresh white noise of the given length.
    Noise { seconds: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotePlan {
    pub voice: usize,
    pub start: f64,
    /// Sources fall silent here and the graph can be dropped.
    pub stop: f64,
    pub source: NoteSource,
    /// Low-pass cutoff sweep (Q 8), when the filter envelope is on.
    pub cutoff: Option<ParamTimeline>,
    pub drive: Option<DrivePlan>,
    pub gain: ParamTimeline,
    pub peak_gain: f32,
    pub release_start: f64,
    pub release_end: f64,
}

impl NotePlan {
    /// Plan one (already arpeggiated) note. `tail` is how long sources keep
    /// running past the end of the note or its release.
    pub fn new(trigger: &NoteTrigger, settings: &VoiceSettings, tail: f64) -> Self {
        let t = trigger.time;
        let duration = trigger.duration.max(0.0);
        let is_noise = trigger.wave.is_noise();

        let peak_gain = peak_gain(settings, trigger.accent);
        let envelope = Envelope::new(&settings.adsr, t, duration);
        let gain = envelope.gain_timeline(peak_gain);
        let stop = (t + duration).max(envelope.release_end) + tail;

        let source = if is_noise {
            NoteSource::Noise { seconds: duration }
        } else {
            let waveform = match trigger.wave {
                WaveType::Sawtooth => SourceWaveform::Basic(OscillatorWaveform::Sawtooth),
                WaveType::Triangle => SourceWaveform::Basic(OscillatorWaveform::Triangle),
                WaveType::Pulse => SourceWaveform::Pulse {
                    width: settings.pwm.pulse_width,
                },
                WaveType::Square | WaveType::Noise => {
                    SourceWaveform::Basic(OscillatorWaveform::Square)
                }
            };
            let detune_cents = if settings.detune.enabled {
                detune_offsets(settings.detune.voices, settings.detune.spread)
            } else {
                vec![0.0]
            };
            let vibrato = settings.vibrato.enabled.then(|| VibratoPlan {
                rate_hz: settings.vibrato.rate,
                depth_cents: settings.vibrato.depth * 100.0,
            });
            NoteSource::Oscillators {
                waveform,
                frequency: frequency_timeline(trigger.frequency, trigger.slide_from, t),
                detune_cents,
                vibrato,
            }
        };

        let cutoff = (!is_noise && settings.filter_envelope.enabled)
            .then(|| filter_timeline(&settings.filter_envelope, trigger.accent, t, duration));

        let drive = (!is_noise && settings.distortion.enabled).then(|| DrivePlan {
            amount: settings.distortion.amount,
            mix: settings.distortion.mix.clamp(0.0, 1.0),
        });

        Self {
            voice: trigger.voice,
            start: t,
            stop,
            source,
            cutoff,
            drive,
            gain,
            peak_gain,
            release_start: envelope.release_start,
            release_end: envelope.release_end,
        }
    }

    /// Turn the plan into a renderable graph. Noise notes draw a new buffer
    /// from `noise` every time.
    pub fn build(self, noise: &mut NoiseBank) -> Box<dyn GraphNode> {
        let (start, stop) = (self.start, self.stop);

        let mut chain: Box<dyn GraphNode> = match self.source {
            NoteSource::Noise { seconds } => NoiseNode::new(noise.generate(seconds), start, stop).boxed(),
            NoteSource::Oscillators {
                waveform,
                frequency,
                detune_cents,
                vibrato,
            } => {
                let shape = match waveform {
                    SourceWaveform::Basic(waveform) => OscillatorShape::Basic(waveform),
                    SourceWaveform::Pulse { width } => OscillatorShape::Table(Arc::new(Wavetable::pulse(width))),
                };
                let layers: Vec<OscNode> = detune_cents
                    .iter()
                    .map(|&cents| {
                        let osc = OscNode::with_shape(shape.clone(), frequency.clone(), start, stop).with_detune(cents);
                        match vibrato {
                            Some(v) => osc.with_vibrato(Vibrato::new(v.rate_hz, v.depth_cents, start, stop)),
                            None => osc,
                        }
                    })
                    .collect();
                Layer::new(layers).boxed()
            }
        };

        if let Some(cutoff) = self.cutoff {
            chain = chain
                .through(FilterNode::new(FilterType::LowPass, cutoff, FILTER_ENVELOPE_Q))
                .boxed();
        }
        if let Some(drive) = self.drive {
            chain = chain.through(ShaperNode::drive(drive.amount, drive.mix)).boxed();
        }
        chain.amplify(EnvNode::new(self.gain)).boxed()
    }
}

pub fn peak_gain(settings: &VoiceSettings, accent: bool) -> f32 {
    let envelope_accent = if settings.volume_envelope.enabled {
        settings.volume_envelope.accent
    } else {
        1.0
    };
    let note_accent = if accent { ACCENT_GAIN } else { 1.0 };
    PEAK_GAIN * envelope_accent * note_accent
}

/// Cents offsets for `voices` layers spread evenly around the pitch.
pub fn detune_offsets(voices: u8, spread: f32) -> Vec<f32> {
    let n = voices.max(1);
    let center = (n - 1) as f32 / 2.0;
    (0..n).map(|i| (i as f32 - center) * spread).collect()
}

fn frequency_timeline(frequency: f32, slide_from: Option<f32>, t: f64) -> ParamTimeline {
    let mut timeline = ParamTimeline::new(frequency);
    match slide_from {
        Some(from) if from != frequency && from > 0.0 => {
            timeline
                .set_value_at_time(from, t)
                .exponential_ramp_to_value_at_time(frequency, t + SLIDE_TIME);
        }
        _ => {
            timeline.set_value_at_time(frequency, t);
        }
    }
    timeline
}

/// Stage boundaries shared by the gain and cutoff envelopes.
struct Envelope {
    start: f64,
    attack_end: f64,
    decay_end: f64,
    release_start: f64,
    release_end: f64,
    sustain: f32,
}

impl Envelope {
    fn from_stages(t: f64, duration: f64, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let attack_end = t + f64::from(attack.max(0.0));
        let decay_end = attack_end + f64::from(decay.max(0.0));
        let release = f64::from(release.max(0.0));
        // Release never starts before decay has finished.
        let release_start = decay_end.max(t + duration - release);
        Self {
            start: t,
            attack_end,
            decay_end,
            release_start,
            release_end: release_start + release,
            sustain,
        }
    }

    fn new(adsr: &AdsrSettings, t: f64, duration: f64) -> Self {
        Self::from_stages(t, duration, adsr.attack, adsr.decay, adsr.sustain, adsr.release)
    }

    fn gain_timeline(&self, peak: f32) -> ParamTimeline {
        let sustain_level = (peak * self.sustain).max(GAIN_FLOOR);
        let mut timeline = ParamTimeline::new(0.0);
        timeline
            .set_value_at_time(0.0, self.start)
            .linear_ramp_to_value_at_time(peak, self.attack_end)
            .exponential_ramp_to_value_at_time(sustain_level, self.decay_end)
            .set_value_at_time(sustain_level, self.release_start)
            .exponential_ramp_to_value_at_time(GAIN_FLOOR, self.release_end);
        timeline
    }
}

fn filter_timeline(fenv: &FilterEnvelopeSettings, accent: bool, t: f64, duration: f64) -> ParamTimeline {
    let boost = if accent { ACCENT_SWEEP } else { 1.0 };
    let low = fenv.base_freq;
    let high = low + FILTER_SWEEP_HZ * fenv.amount * boost;
    let held = low + (high - low) * fenv.sustain;

    let floor = |hz: f32| if hz.is_finite() { hz.max(MIN_FILTER_FREQ) } else { MIN_FILTER_FREQ };
    let (low, high, held) = (floor(low), floor(high), floor(held));

    let stages = Envelope::from_stages(t, duration, fenv.attack, fenv.decay, fenv.sustain, fenv.release);
    let mut timeline = ParamTimeline::new(low);
    timeline
        .set_value_at_time(low, stages.start)
        .exponential_ramp_to_value_at_time(high, stages.attack_end)
        .exponential_ramp_to_value_at_time(held, stages.decay_end)
        .set_value_at_time(held, stages.release_start)
        .exponential_ramp_to_value_at_time(low, stages.release_end);
    timeline
}
