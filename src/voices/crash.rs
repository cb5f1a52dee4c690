//! Crash cymbal voice.
//!
//! Noise through a 4 kHz high-pass with a long 1.2 s fall from 0.5 to 0.01.
//! The one-second shared noise buffer runs out before the envelope does, so
//! the last stretch of the tail is silent.

use std::sync::Arc;

use crate::dsp::noise::NoiseBuffer;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, filter::FilterNode, noise::NoiseNode, GraphNode};

pub const CRASH_LENGTH: f64 = 1.5;

pub fn crash(time: f64, noise: Arc<NoiseBuffer>) -> impl GraphNode {
    NoiseNode::new(noise, time, time + CRASH_LENGTH)
        .through(FilterNode::highpass(4000.0))
        .amplify(EnvNode::exp_decay(0.5, 0.01, time, time + 1.2))
}
