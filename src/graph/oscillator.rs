use std::sync::Arc;

use crate::dsp::automation::ParamTimeline;
use crate::dsp::oscillator::{OscillatorBlock, OscillatorShape, OscillatorWaveform, Wavetable};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Scheduled Oscillator
====================

A note oscillator is a one-shot source: it is created when a step fires,
starts at an exact clock time, stops at an exact clock time and is then
dropped. Outside [start, stop) it writes silence and its phase does not move.

Pitch is the product of three things, evaluated per sample:

    f(t) = frequency(t) * 2 ^ ((detune(t) + vibrato(t)) / 1200)

  frequency   Hz timeline. A plain note sets it once; a slide sets the
              previous pitch and ramps exponentially to the target over 80 ms;
              a kick sweeps 120 Hz down to 40 Hz.
  detune      cents timeline. Reese layers hold a fixed offset here.
  vibrato     a sine LFO in cents (depth in semitones * 100), running only
              while the note sounds.

Waveform character:

  square     odd harmonics, hollow        triangle   soft, weak odd harmonics
  sawtooth   every harmonic, bright       pulse      wavetable, duty-cycle timbre
  sine       fundamental only (drums, vibrato LFO)

Example usage:
  let mut freq = ParamTimeline::new(440.0);
  freq.set_value_at_time(440.0, t);
  let osc = OscNode::new(OscillatorWaveform::Sawtooth, freq, t, t + 0.3);
  let voice = osc.amplify(EnvNode::new(gain_timeline));
*/

#[derive(Debug, Clone)]
pub struct Vibrato {
    lfo: OscillatorBlock,
    pub rate_hz: f32,
    pub depth_cents: f32,
    pub start: f64,
    pub stop: f64,
}

impl Vibrato {
    pub fn new(rate_hz: f32, depth_cents: f32, start: f64, stop: f64) -> Self {
        Self {
            lfo: OscillatorBlock::sine(),
            rate_hz,
            depth_cents,
            start,
            stop,
        }
    }

    #[inline]
    fn next_cents(&mut self, time: f64, sample_rate: f32) -> f32 {
        if time < self.start || time >= self.stop {
            return 0.0;
        }
        self.lfo.next_sample(self.rate_hz, sample_rate) * self.depth_cents
    }
}

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: ParamTimeline,
    detune: ParamTimeline,
    vibrato: Option<Vibrato>,
    start: f64,
    stop: f64,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: ParamTimeline, start: f64, stop: f64) -> Self {
        Self::from_block(OscillatorBlock::new(waveform), frequency, start, stop)
    }

    pub fn wavetable(table: Arc<Wavetable>, frequency: ParamTimeline, start: f64, stop: f64) -> Self {
        Self::from_block(OscillatorBlock::wavetable(table), frequency, start, stop)
    }

    pub fn with_shape(shape: OscillatorShape, frequency: ParamTimeline, start: f64, stop: f64) -> Self {
        let block = match shape {
            OscillatorShape::Basic(waveform) => OscillatorBlock::new(waveform),
            OscillatorShape::Table(table) => OscillatorBlock::wavetable(table),
        };
        Self::from_block(block, frequency, start, stop)
    }

    fn from_block(osc: OscillatorBlock, frequency: ParamTimeline, start: f64, stop: f64) -> Self {
        Self {
            osc,
            frequency,
            detune: ParamTimeline::constant(0.0),
            vibrato: None,
            start,
            stop,
        }
    }

    /// Oscillator at a fixed pitch between `start` and `stop`.
    pub fn fixed(waveform: OscillatorWaveform, hz: f32, start: f64, stop: f64) -> Self {
        Self::new(waveform, ParamTimeline::constant(hz), start, stop)
    }

    /// Constant detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune = ParamTimeline::constant(cents);
        self
    }

    pub fn with_vibrato(mut self, vibrato: Vibrato) -> Self {
        self.vibrato = Some(vibrato);
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn frequency(&self) -> &ParamTimeline {
        &self.frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.frame_time(i);
            if t < self.start || t >= self.stop {
                *sample = 0.0;
                continue;
            }

            let mut cents = self.detune.value_at(t);
            if let Some(vibrato) = self.vibrato.as_mut() {
                cents += vibrato.next_cents(t, ctx.sample_rate);
            }
            let mut hz = self.frequency.value_at(t);
            if cents != 0.0 {
                hz *= 2.0_f32.powf(cents / 1200.0);
            }
            *sample = self.osc.next_sample(hz, ctx.sample_rate);
        }
    }
}
