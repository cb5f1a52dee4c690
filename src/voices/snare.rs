//! Snare drum voice.
//!
//! A synthesized snare combining a tonal body with noise for the "snare" rattle.
//! Real snares have metal wires stretched across the bottom head that buzz
//! when the drum is struck; band-passed noise stands in for the wires.
//!
//! # How It Works
//!
//! 1. Shared noise through a band-pass at 1.8 kHz (Q 0.8), 0.8 → 0.01 over 250 ms
//! 2. Triangle at 200 Hz for the head, 0.4 → 0.01 over 200 ms
//! 3. Both branches summed, each with its own envelope, stopped at 300 ms

use std::sync::Arc;

use crate::dsp::noise::NoiseBuffer;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, noise::NoiseNode,
    oscillator::OscNode, GraphNode,
};

pub const SNARE_LENGTH: f64 = 0.3;

/// Create a snare drum triggered at `time`.
pub fn snare(time: f64, noise: Arc<NoiseBuffer>) -> impl GraphNode {
    let stop = time + SNARE_LENGTH;

    let rattle = NoiseNode::new(noise, time, stop)
        .through(FilterNode::bandpass(1800.0).with_q(0.8))
        .amplify(EnvNode::exp_decay(0.8, 0.01, time, time + 0.25));

    let body = OscNode::fixed(OscillatorWaveform::Triangle, 200.0, time, stop)
        .amplify(EnvNode::exp_decay(0.4, 0.01, time, time + 0.2));

    rattle.sum(body)
}
