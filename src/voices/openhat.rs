//! Open hi-hat voice.
//!
//! The closed hat with the pedal up: a slightly lower high-pass (5 kHz) and a
//! decay five times longer, 0.7 → 0.01 over 400 ms.

use std::sync::Arc;

use crate::dsp::noise::NoiseBuffer;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, noise::NoiseNode, GraphNode};

pub const OPENHAT_LENGTH: f64 = 0.5;

pub fn openhat(time: f64, noise: Arc<NoiseBuffer>) -> impl GraphNode {
    NoiseNode::new(noise, time, time + OPENHAT_LENGTH)
        .through(FilterNode::highpass(5000.0))
        .amplify(EnvNode::exp_decay(0.7, 0.01, time, time + 0.4))
}
