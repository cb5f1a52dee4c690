//! Tom voice.
//!
//! Built like the kick but higher and slower: a sine falling from 180 Hz to
//! 80 Hz over 250 ms, level 0.9 → 0.001 over 400 ms.

use crate::dsp::automation::ParamTimeline;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode, GraphNode};

pub const TOM_LENGTH: f64 = 0.5;

pub fn tom(time: f64) -> impl GraphNode {
    let mut pitch = ParamTimeline::new(180.0);
    pitch
        .set_value_at_time(180.0, time)
        .exponential_ramp_to_value_at_time(80.0, time + 0.25);

    OscNode::new(OscillatorWaveform::Sine, pitch, time, time + TOM_LENGTH)
        .amplify(EnvNode::exp_decay(0.9, 0.001, time, time + 0.4))
}
